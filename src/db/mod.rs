//! Database layer
//!
//! SQLite is the default backend (single-file deployment); MySQL is
//! selected through `database.driver` in the configuration.
//!
//! ```ignore
//! use newspaper::config::DatabaseConfig;
//! use newspaper::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod query;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
