pub mod test_user;

use admin_repo::user_repo::UserRepo;
use serde::Deserialize;
use std::fs;
use std::sync::Arc;
use tracing::warn;

#[derive(Deserialize)]
struct TestConfig {
    database_url: String,
}

#[derive(Debug)]
pub enum RepoType {
    SQLx,
    Mem,
}

/// Builds the repo under test. The SQLx repo needs a `config_test.toml` pointing at a
/// disposable database; without one the case is skipped by returning `None`.
pub async fn build_repo(repo_type: RepoType) -> Option<Arc<dyn UserRepo>> {
    match repo_type {
        RepoType::SQLx => {
            let Ok(config) = fs::read_to_string("config_test.toml") else {
                warn!("config_test.toml not found, skipping SQLx repo");
                return None;
            };
            let config: TestConfig = toml::from_str(config.as_str()).unwrap();

            let pool = admin_repo::sqlx_repo::create_pool(&config.database_url, 1)
                .await
                .unwrap();
            admin_repo::sqlx_repo::migrate(&pool).await.unwrap();
            Some(admin_repo::sqlx_repo::create_repos(pool))
        }
        RepoType::Mem => Some(admin_repo::mem_repo::create_repos()),
    }
}
