pub mod catalog;
pub mod user_repo;

// implementation modules
pub mod mem_repo;
pub mod sqlx_repo;
