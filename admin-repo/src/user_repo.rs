use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub type UserId = i64;

/// Persistence gateway for user identities.
///
/// Lookups return `Ok(None)` when nothing matches; an `Err` always means the
/// storage itself failed.
#[async_trait]
pub trait UserRepo: Sync + Send {
    async fn create_user(&self, user: NewUser) -> Result<User, UserRepoError>;
    async fn get_user_by_id(&self, user_id: UserId) -> Result<Option<User>, UserRepoError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, UserRepoError>;
}

/// A stored user. `password_hash` is the encoded hash, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(username: String, email: String, password_hash: String) -> NewUser {
        NewUser {
            username,
            email,
            password_hash,
        }
    }
}

#[derive(Error, Debug)]
pub enum UserRepoError {
    #[error("Email {0} is already registered")]
    EmailTaken(String),
    #[error("Username {0} is already taken")]
    UsernameTaken(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
