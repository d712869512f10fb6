use crate::sqlx_repo::DbPool;
use crate::user_repo::{NewUser, User, UserId, UserRepo, UserRepoError};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query_as, Postgres};
use tracing::instrument;

const EMAIL_CONSTRAINT: &str = "users_email_key";
const USERNAME_CONSTRAINT: &str = "users_username_key";

#[derive(sqlx::FromRow)]
struct UserEntry {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserEntry> for User {
    fn from(u: UserEntry) -> Self {
        User {
            id: u.id,
            username: u.username,
            email: u.email,
            password_hash: u.password_hash,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

pub struct SQLxUserRepo {
    pool: DbPool,
}

impl SQLxUserRepo {
    pub fn new(pool: DbPool) -> SQLxUserRepo {
        SQLxUserRepo { pool }
    }
}

/// Maps a unique violation on one of the `users` constraints to its typed error.
fn classify_insert_error(e: sqlx::Error, user: NewUser) -> UserRepoError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some(EMAIL_CONSTRAINT) => return UserRepoError::EmailTaken(user.email),
                Some(USERNAME_CONSTRAINT) => return UserRepoError::UsernameTaken(user.username),
                _ => {}
            }
        }
    }
    let context = format!("Unable to create user {}", user.username);
    UserRepoError::Other(anyhow::Error::new(e).context(context))
}

#[async_trait]
impl UserRepo for SQLxUserRepo {
    #[instrument(skip(self, user), fields(username = %user.username, email = %user.email))]
    async fn create_user(&self, user: NewUser) -> Result<User, UserRepoError> {
        let result = query_as::<Postgres, UserEntry>(
            "INSERT INTO users(username, email, password_hash) VALUES($1, $2, $3)
             RETURNING id, username, email, password_hash, created_at, updated_at",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(entry) => Ok(entry.into()),
            Err(e) => Err(classify_insert_error(e, user)),
        }
    }

    #[instrument(skip(self))]
    async fn get_user_by_id(&self, user_id: UserId) -> Result<Option<User>, UserRepoError> {
        let user: Option<UserEntry> = query_as::<Postgres, UserEntry>(
            "SELECT id, username, email, password_hash, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to get user {}", user_id))?;
        Ok(user.map(User::from))
    }

    #[instrument(skip(self))]
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, UserRepoError> {
        let user: Option<UserEntry> = query_as::<Postgres, UserEntry>(
            "SELECT id, username, email, password_hash, created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to get user with email {}", email))?;
        Ok(user.map(User::from))
    }
}
