use actix_web::error::JsonPayloadError;
use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::user::service::UserService;

pub mod config;
pub mod error;
mod health;
pub mod password;
pub mod tracing;
pub mod user;

/// Registers shared state and every route. Middleware is left to the caller so the
/// same configuration serves the binary and the tests.
pub fn app_config_func(
    user_service: Arc<dyn UserService>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(user_service))
            .app_data(json_config())
            .service(health::health)
            .service(web::scope("/api/v1").service(user::user_service()));
    }
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        ::tracing::error!(req_path = req.path(), %err);
        match err {
            JsonPayloadError::Deserialize(deserialize_err) => {
                let error_body = serde_json::json!({
                    "error": "Unable to parse JSON payload",
                    "detail": format!("{}", deserialize_err),
                });
                actix_web::error::InternalError::from_response(
                    deserialize_err,
                    HttpResponse::BadRequest()
                        .content_type("application/json")
                        .body(error_body.to_string()),
                )
                .into()
            }
            _ => err.into(),
        }
    })
}
