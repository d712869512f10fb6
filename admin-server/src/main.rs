#[macro_use]
extern crate tracing;

use std::error::Error;
use std::sync::Arc;

use actix_web::{App, HttpServer};
use anyhow::Context;
use tracing::level_filters::LevelFilter;

use admin_lib::config::Config;
use admin_lib::tracing::{create_middleware, create_subscriber, Recovery};
use admin_lib::user::service::{UserService, UserServiceImpl};
use admin_repo::sqlx_repo;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let tracing_guard = tracing::subscriber::set_default(create_subscriber(LevelFilter::INFO));
    info!("tracing initialized");

    let config = Config::load()
        .context("Unable to load config")
        .map_err(fatal)?;

    let subscriber = create_subscriber(config.log.level_filter());
    tracing::subscriber::set_global_default(subscriber)?;
    drop(tracing_guard);
    info!(level = %config.log.level, "Configuration loaded");

    let max_connections = config.database.max_connections;
    let pool = match &config.database.dsn {
        Some(dsn) => {
            let pool = sqlx_repo::create_pool(dsn, max_connections)
                .await
                .map_err(fatal)?;
            sqlx_repo::migrate(&pool).await.map_err(fatal)?;
            pool
        }
        None => {
            warn!("No database DSN configured, skipping migrations");
            sqlx_repo::connect_lazy(max_connections)
        }
    };

    let user_repo = sqlx_repo::create_repos(pool.clone());
    let user_service: Arc<dyn UserService> = Arc::new(UserServiceImpl::new(
        user_repo,
        config.password.hasher(),
        info_span!("user_service"),
    ));

    let port = config.server.port;
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Recovery)
            .wrap(create_middleware())
            .configure(admin_lib::app_config_func(user_service.clone()))
    })
    // SIGINT/SIGTERM stop accepting, then in-flight requests get this long to finish
    .shutdown_timeout(config.server.shutdown_timeout_secs)
    .bind(("0.0.0.0", port))
    .with_context(|| format!("Unable to bind port {}", port))
    .map_err(fatal)?;

    info!(port, "Server listening");
    server.run().await?;
    info!("Server stopped");

    pool.close().await;
    info!("Database pool closed");

    Ok(())
}

fn fatal(e: anyhow::Error) -> anyhow::Error {
    error!("{:#}", e);
    e
}
