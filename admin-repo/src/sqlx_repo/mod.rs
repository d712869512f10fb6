mod user_repo;

use crate::sqlx_repo::user_repo::SQLxUserRepo;
use crate::user_repo::UserRepo;
use anyhow::Context;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use tracing::info;

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str, max_pool_size: u32) -> Result<DbPool, anyhow::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_pool_size)
        .connect(database_url)
        .await
        .context("Unable to connect to database")?;
    info!(max_pool_size, "Connected to database");
    Ok(pool)
}

/// Builds a pool without opening any connection, using the libpq environment
/// (`PGHOST`, `PGUSER`, ...) for connection settings. Errors surface on first use.
pub fn connect_lazy(max_pool_size: u32) -> DbPool {
    PgPoolOptions::new()
        .max_connections(max_pool_size)
        .connect_lazy_with(PgConnectOptions::new())
}

pub async fn migrate(pool: &DbPool) -> Result<(), anyhow::Error> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Unable to run database migrations")?;
    info!("Database migrations applied");
    Ok(())
}

pub fn create_repos(pool: DbPool) -> Arc<dyn UserRepo> {
    Arc::new(SQLxUserRepo::new(pool))
}
