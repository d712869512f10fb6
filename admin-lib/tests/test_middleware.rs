use std::sync::Arc;

use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use actix_web::{test, web, App, HttpResponse};
use admin_lib::user::service::UserService;
use rstest::rstest;
use serde_json::{json, Value};

use utils::tracing_setup;
use utils::user_service;

#[macro_use]
mod utils;

#[rstest]
#[actix_rt::test]
async fn test_health(_tracing_setup: &(), user_service: Arc<dyn UserService>) {
    let service = test::init_service(build_app!(user_service)).await;

    let request = TestRequest::get().uri("/health").to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body, json!({ "status": "ok" }));
}

#[rstest]
#[actix_rt::test]
async fn test_unknown_route(_tracing_setup: &(), user_service: Arc<dyn UserService>) {
    let service = test::init_service(build_app!(user_service)).await;

    let request = TestRequest::get().uri("/api/v2/users/1").to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

async fn explode() -> HttpResponse {
    panic!("handler blew up")
}

async fn fine() -> HttpResponse {
    HttpResponse::Ok().finish()
}

async fn echo_id(path: web::Path<i64>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "id": path.into_inner() }))
}

#[rstest]
#[actix_rt::test]
async fn test_recovery_turns_panic_into_500(_tracing_setup: &()) {
    let app = App::new()
        .wrap(admin_lib::tracing::Recovery)
        .route("/explode", web::get().to(explode))
        .route("/fine", web::get().to(fine));
    let service = test::init_service(app).await;

    let request = TestRequest::get().uri("/explode").to_request();
    let error = test::try_call_service(&service, request)
        .await
        .err()
        .unwrap();
    let response = error.error_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = to_bytes(response.into_body()).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "error": "internal server error" }));

    // the service keeps serving after a panic
    let request = TestRequest::get().uri("/fine").to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[actix_rt::test]
async fn test_recovery_passes_routed_requests_through(_tracing_setup: &()) {
    let app = App::new()
        .wrap(admin_lib::tracing::Recovery)
        .wrap(admin_lib::tracing::create_middleware())
        .route("/items/{id}", web::get().to(echo_id));
    let service = test::init_service(app).await;

    for _ in 0..2 {
        let request = TestRequest::get().uri("/items/42").to_request();
        let response = test::call_service(&service, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body, json!({ "id": 42 }));
    }
}
