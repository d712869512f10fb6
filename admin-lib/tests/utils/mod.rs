use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use admin_lib::password::PasswordHasher;
use admin_lib::user::service::{UserService, UserServiceError, UserServiceImpl};
use admin_repo::user_repo::{User, UserId};
use anyhow::anyhow;
use async_trait::async_trait;
use rstest::*;
use tracing::info;
use tracing::Level;
use tracing::Span;

#[allow(unused_macros)]
macro_rules! build_app {
    ($user_service:expr) => {{
        let app = actix_web::App::new()
            .wrap(admin_lib::tracing::Recovery)
            .wrap(admin_lib::tracing::create_middleware())
            .configure(admin_lib::app_config_func($user_service));
        tracing::info!("Built app");
        app
    }};
}

#[allow(unused_macros)]
macro_rules! register_user {
    (&$service:ident, $body:expr) => {{
        let request = actix_web::test::TestRequest::post()
            .uri("/api/v1/users/register")
            .set_json(&$body)
            .to_request();
        actix_web::test::call_service(&$service, request).await
    }};
}

/// Fails every call and counts how often it was reached.
#[allow(dead_code)]
#[derive(Default)]
pub struct FailingUserService {
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl FailingUserService {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserService for FailingUserService {
    async fn register_user(
        &self,
        _username: String,
        _email: String,
        _password: String,
    ) -> Result<User, UserServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(UserServiceError::RegistrationFailed(anyhow!(
            "connection refused: postgres://admin:hunter2@db"
        )))
    }

    async fn get_user_profile(&self, user_id: UserId) -> Result<User, UserServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(UserServiceError::ProfileLookupFailed(
            user_id,
            anyhow!("connection refused: postgres://admin:hunter2@db"),
        ))
    }
}

#[fixture]
#[once]
pub fn tracing_setup() -> () {
    tracing_subscriber::fmt()
        .pretty()
        .with_max_level(Level::DEBUG)
        .init();
    info!("tracing initialized");
}

#[fixture]
pub fn user_service() -> Arc<dyn UserService> {
    let user_repo = admin_repo::mem_repo::create_repos();
    Arc::new(UserServiceImpl::new(
        user_repo,
        PasswordHasher::new(64, 1),
        Span::none(),
    ))
}
