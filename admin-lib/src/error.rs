use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::user::models::ValidationError;
use crate::user::service::UserServiceError;

pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Invalid user id {0}")]
    InvalidUserId(String),
    #[error(transparent)]
    UserService(#[from] UserServiceError),
}

impl ResponseError for HandlerError {
    fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::Validation(_) | HandlerError::InvalidUserId(_) => {
                StatusCode::BAD_REQUEST
            }
            HandlerError::UserService(e) => match e {
                UserServiceError::DuplicateEmail(_) | UserServiceError::DuplicateUsername(_) => {
                    StatusCode::CONFLICT
                }
                UserServiceError::UserNotFound(_) => StatusCode::NOT_FOUND,
                UserServiceError::RegistrationFailed(_)
                | UserServiceError::ProfileLookupFailed(_, _) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let status = self.status_code();
        let body = match self {
            HandlerError::Validation(e) => json!({ "error": e.message, "field": e.field }),
            // causes are logged by the service, never sent to the caller
            _ if status.is_server_error() => json!({ "error": INTERNAL_ERROR_MESSAGE }),
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(status).json(body)
    }
}
