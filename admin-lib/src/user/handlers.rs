use crate::error::HandlerError;
use crate::user::models::{RegisterUserRequest, RegisteredUser, UserProfile};
use crate::user::service::UserService;
use actix_web::{get, post, web, HttpResponse, Responder};
use admin_repo::user_repo::UserId;
use std::sync::Arc;
use tracing::warn;

#[post("/register")]
pub async fn register_user(
    user_service: web::Data<Arc<dyn UserService>>,
    request: web::Json<RegisterUserRequest>,
) -> Result<impl Responder, HandlerError> {
    let request = request.into_inner();
    if let Err(e) = request.validate() {
        warn!(field = e.field, %e, "Rejected registration request");
        return Err(e.into());
    }

    let user = user_service
        .register_user(request.username, request.email, request.password)
        .await?;

    Ok(HttpResponse::Created().json(RegisteredUser {
        message: "User registered".to_owned(),
        profile: user.into(),
    }))
}

#[get("/{user_id}")]
pub async fn get_user_profile(
    user_service: web::Data<Arc<dyn UserService>>,
    user_id: web::Path<String>,
) -> Result<impl Responder, HandlerError> {
    let user_id = parse_user_id(user_id.into_inner())?;

    let user = user_service.get_user_profile(user_id).await?;
    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}

fn parse_user_id(raw: String) -> Result<UserId, HandlerError> {
    match raw.parse::<UserId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            warn!(user_id = %raw, "Rejected invalid user id");
            Err(HandlerError::InvalidUserId(raw))
        }
    }
}
