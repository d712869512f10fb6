use actix_web::body::MessageBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::InternalError;
use actix_web::{Error, HttpResponse};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use futures_util::FutureExt;
use serde_json::json;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::level_filters::LevelFilter;
use tracing::{error, Span};
use tracing_actix_web::{DefaultRootSpanBuilder, RootSpanBuilder, TracingLogger};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;

use crate::error::INTERNAL_ERROR_MESSAGE;

pub struct AdminRootSpanBuilder;

impl RootSpanBuilder for AdminRootSpanBuilder {
    fn on_request_start(request: &ServiceRequest) -> Span {
        tracing_actix_web::root_span!(request)
    }

    fn on_request_end<B: MessageBody>(span: Span, outcome: &Result<ServiceResponse<B>, Error>) {
        DefaultRootSpanBuilder::on_request_end(span, outcome);
    }
}

pub fn create_middleware() -> TracingLogger<AdminRootSpanBuilder> {
    TracingLogger::<AdminRootSpanBuilder>::new()
}

/// Stdout subscriber filtered at `level`.
pub fn create_subscriber(level: LevelFilter) -> impl tracing::Subscriber + Send + Sync {
    registry::Registry::default()
        .with(level)
        .with(tracing_subscriber::fmt::Layer::default())
}

/// Turns a panicking handler into a 500 response instead of a dropped connection.
pub struct Recovery;

impl<S, B> Transform<S, ServiceRequest> for Recovery
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RecoveryMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RecoveryMiddleware { service }))
    }
}

pub struct RecoveryMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RecoveryMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // the router needs sole ownership of the request, so only the path is kept
        let path = req.path().to_owned();
        let fut = match panic::catch_unwind(AssertUnwindSafe(|| self.service.call(req))) {
            Ok(fut) => AssertUnwindSafe(fut).catch_unwind(),
            Err(payload) => return Box::pin(ready(Err(panic_error(&path, payload)))),
        };
        Box::pin(async move {
            match fut.await {
                Ok(res) => res,
                Err(payload) => Err(panic_error(&path, payload)),
            }
        })
    }
}

fn panic_error(path: &str, payload: Box<dyn Any + Send>) -> Error {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_default();
    error!(path, panic = %message, "Handler panicked");
    InternalError::from_response(
        "handler panicked",
        HttpResponse::InternalServerError().json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
    )
    .into()
}
