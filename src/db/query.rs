//! Driver-dispatching query helpers
//!
//! Repositories write a statement once (both backends accept `?`
//! placeholders) together with a list of [`Bind`] values, and these helpers
//! run it against whichever pool is configured. Row decoding stays with the
//! repository because SQLite and MySQL rows are distinct types.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{MySql, MySqlPool, Row, Sqlite, SqlitePool};

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;

/// A value bound to a `?` placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Int(i64),
    Text(String),
    OptText(Option<String>),
    Time(DateTime<Utc>),
    OptTime(Option<DateTime<Utc>>),
}

impl From<i64> for Bind {
    fn from(value: i64) -> Self {
        Bind::Int(value)
    }
}

impl From<&str> for Bind {
    fn from(value: &str) -> Self {
        Bind::Text(value.to_string())
    }
}

impl From<String> for Bind {
    fn from(value: String) -> Self {
        Bind::Text(value)
    }
}

impl From<Option<String>> for Bind {
    fn from(value: Option<String>) -> Self {
        Bind::OptText(value)
    }
}

impl From<DateTime<Utc>> for Bind {
    fn from(value: DateTime<Utc>) -> Self {
        Bind::Time(value)
    }
}

impl From<Option<DateTime<Utc>>> for Bind {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        Bind::OptTime(value)
    }
}

fn bind_sqlite<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    binds: Vec<Bind>,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for bind in binds {
        query = match bind {
            Bind::Int(v) => query.bind(v),
            Bind::Text(v) => query.bind(v),
            Bind::OptText(v) => query.bind(v),
            Bind::Time(v) => query.bind(v),
            Bind::OptTime(v) => query.bind(v),
        };
    }
    query
}

fn bind_mysql(
    mut query: Query<'_, MySql, MySqlArguments>,
    binds: Vec<Bind>,
) -> Query<'_, MySql, MySqlArguments> {
    for bind in binds {
        query = match bind {
            Bind::Int(v) => query.bind(v),
            Bind::Text(v) => query.bind(v),
            Bind::OptText(v) => query.bind(v),
            Bind::Time(v) => query.bind(v),
            Bind::OptTime(v) => query.bind(v),
        };
    }
    query
}

// ============================================================================
// SQLite
// ============================================================================

pub async fn fetch_all_sqlite(pool: &SqlitePool, sql: &str, binds: Vec<Bind>) -> Result<Vec<SqliteRow>> {
    bind_sqlite(sqlx::query(sql), binds)
        .fetch_all(pool)
        .await
        .with_context(|| format!("Query failed: {}", sql.trim()))
}

pub async fn fetch_optional_sqlite(
    pool: &SqlitePool,
    sql: &str,
    binds: Vec<Bind>,
) -> Result<Option<SqliteRow>> {
    bind_sqlite(sqlx::query(sql), binds)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Query failed: {}", sql.trim()))
}

/// Run an INSERT and return the new row id
pub async fn insert_sqlite(pool: &SqlitePool, sql: &str, binds: Vec<Bind>) -> Result<i64> {
    let result = bind_sqlite(sqlx::query(sql), binds)
        .execute(pool)
        .await
        .with_context(|| format!("Insert failed: {}", sql.trim()))?;
    Ok(result.last_insert_rowid())
}

pub async fn execute_sqlite(pool: &SqlitePool, sql: &str, binds: Vec<Bind>) -> Result<u64> {
    let result = bind_sqlite(sqlx::query(sql), binds)
        .execute(pool)
        .await
        .with_context(|| format!("Statement failed: {}", sql.trim()))?;
    Ok(result.rows_affected())
}

// ============================================================================
// MySQL
// ============================================================================

pub async fn fetch_all_mysql(pool: &MySqlPool, sql: &str, binds: Vec<Bind>) -> Result<Vec<MySqlRow>> {
    bind_mysql(sqlx::query(sql), binds)
        .fetch_all(pool)
        .await
        .with_context(|| format!("Query failed: {}", sql.trim()))
}

pub async fn fetch_optional_mysql(
    pool: &MySqlPool,
    sql: &str,
    binds: Vec<Bind>,
) -> Result<Option<MySqlRow>> {
    bind_mysql(sqlx::query(sql), binds)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Query failed: {}", sql.trim()))
}

/// Run an INSERT and return the new row id
pub async fn insert_mysql(pool: &MySqlPool, sql: &str, binds: Vec<Bind>) -> Result<i64> {
    let result = bind_mysql(sqlx::query(sql), binds)
        .execute(pool)
        .await
        .with_context(|| format!("Insert failed: {}", sql.trim()))?;
    Ok(result.last_insert_id() as i64)
}

pub async fn execute_mysql(pool: &MySqlPool, sql: &str, binds: Vec<Bind>) -> Result<u64> {
    let result = bind_mysql(sqlx::query(sql), binds)
        .execute(pool)
        .await
        .with_context(|| format!("Statement failed: {}", sql.trim()))?;
    Ok(result.rows_affected())
}

// ============================================================================
// Driver-independent helpers
// ============================================================================

/// Run an INSERT on whichever backend the pool uses
pub async fn insert(pool: &DynDatabasePool, sql: &str, binds: Vec<Bind>) -> Result<i64> {
    match pool.driver() {
        DatabaseDriver::Sqlite => insert_sqlite(pool.sqlite()?, sql, binds).await,
        DatabaseDriver::Mysql => insert_mysql(pool.mysql()?, sql, binds).await,
    }
}

/// Run an UPDATE/DELETE and return the affected row count
pub async fn execute(pool: &DynDatabasePool, sql: &str, binds: Vec<Bind>) -> Result<u64> {
    match pool.driver() {
        DatabaseDriver::Sqlite => execute_sqlite(pool.sqlite()?, sql, binds).await,
        DatabaseDriver::Mysql => execute_mysql(pool.mysql()?, sql, binds).await,
    }
}

/// Run a query whose single row has an integer column named `count`
pub async fn count(pool: &DynDatabasePool, sql: &str, binds: Vec<Bind>) -> Result<i64> {
    let count = match pool.driver() {
        DatabaseDriver::Sqlite => fetch_optional_sqlite(pool.sqlite()?, sql, binds)
            .await?
            .map(|row| row.try_get::<i64, _>("count"))
            .transpose()?,
        DatabaseDriver::Mysql => fetch_optional_mysql(pool.mysql()?, sql, binds)
            .await?
            .map(|row| row.try_get::<i64, _>("count"))
            .transpose()?,
    };
    Ok(count.unwrap_or(0))
}

/// Escape `%`, `_` and the escape character itself for a `LIKE ... ESCAPE '!'` pattern
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '!' | '%' | '_') {
            escaped.push('!');
        }
        escaped.push(c);
    }
    escaped
}

/// Build a "contains" pattern for `LOWER(col) LIKE LOWER(?) ESCAPE '!'`.
/// Case folding is left to the database so both sides fold the same way.
pub fn contains_pattern(input: &str) -> String {
    format!("%{}%", escape_like(input))
}
