use actix_web::web;
use admin_repo::user_repo::{NewUser, User, UserId, UserRepo, UserRepoError};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, Span};

use crate::password::PasswordHasher;

#[derive(Error, Debug)]
pub enum UserServiceError {
    #[error("Email {0} is already registered")]
    DuplicateEmail(String),
    #[error("Username {0} is already taken")]
    DuplicateUsername(String),
    #[error("User {0} not found")]
    UserNotFound(UserId),
    #[error("Unable to register user")]
    RegistrationFailed(#[source] anyhow::Error),
    #[error("Unable to look up user {0}")]
    ProfileLookupFailed(UserId, #[source] anyhow::Error),
}

/// User registration and profile lookup. Depends only on the [UserRepo] contract.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn register_user(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> Result<User, UserServiceError>;

    async fn get_user_profile(&self, user_id: UserId) -> Result<User, UserServiceError>;
}

pub struct UserServiceImpl {
    repo: Arc<dyn UserRepo>,
    hasher: PasswordHasher,
    span: Span,
}

impl UserServiceImpl {
    /// Operation spans nest under the caller's current span and link back to `span`.
    pub fn new(repo: Arc<dyn UserRepo>, hasher: PasswordHasher, span: Span) -> UserServiceImpl {
        UserServiceImpl { repo, hasher, span }
    }

    async fn hash_password(&self, password: String) -> Result<String, anyhow::Error> {
        let hasher = self.hasher.clone();
        web::block(move || hasher.encode_password(&password))
            .await
            .map_err(|e| anyhow!("Blocking error: {}", e))?
            .context("Unable to hash password")
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self, password), follows_from = self.span.id())]
    async fn register_user(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> Result<User, UserServiceError> {
        let existing = self.repo.get_user_by_email(&email).await.map_err(|e| {
            error!(%e, "Unable to check for existing user");
            UserServiceError::RegistrationFailed(e.into())
        })?;
        if existing.is_some() {
            return Err(UserServiceError::DuplicateEmail(email));
        }

        let password_hash = self.hash_password(password).await.map_err(|e| {
            error!("Unable to hash password: {:#}", e);
            UserServiceError::RegistrationFailed(e)
        })?;

        let user = self
            .repo
            .create_user(NewUser::new(username, email, password_hash))
            .await
            .map_err(|e| match e {
                // a concurrent registration won the race past the pre-check
                UserRepoError::EmailTaken(email) => UserServiceError::DuplicateEmail(email),
                UserRepoError::UsernameTaken(username) => {
                    UserServiceError::DuplicateUsername(username)
                }
                UserRepoError::Other(e) => {
                    error!("Unable to create user: {:#}", e);
                    UserServiceError::RegistrationFailed(e)
                }
            })?;

        info!(user_id = user.id, email = %user.email, "User registered");
        Ok(user)
    }

    #[instrument(skip(self), follows_from = self.span.id())]
    async fn get_user_profile(&self, user_id: UserId) -> Result<User, UserServiceError> {
        let user = self.repo.get_user_by_id(user_id).await.map_err(|e| {
            error!(%e, "Unable to look up user");
            UserServiceError::ProfileLookupFailed(user_id, e.into())
        })?;
        user.ok_or(UserServiceError::UserNotFound(user_id))
    }
}
