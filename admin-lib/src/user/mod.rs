use actix_web::{web, Scope};

mod handlers;
pub mod models;
pub mod service;

pub fn user_service() -> Scope {
    web::scope("/users")
        .service(handlers::register_user)
        .service(handlers::get_user_profile)
}
