//! Category repository
//!
//! This module provides:
//! - `CategoryRepository` trait defining the interface for category data access
//! - `SqlxCategoryRepository` implementing the trait for SQLite and MySQL

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::mysql::MySqlRow;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;

use crate::config::DatabaseDriver;
use crate::db::query::{self, Bind};
use crate::db::DynDatabasePool;
use crate::models::Category;

const SELECT_CATEGORY: &str = "SELECT id, name, created_at, updated_at FROM categories";

/// Category repository trait
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a category with a unique name
    async fn create(&self, name: &str) -> Result<Category>;

    /// Get category by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Category>>;

    /// List all categories in creation order
    async fn list_all(&self) -> Result<Vec<Category>>;
}

/// SQLx-based category repository implementation
pub struct SqlxCategoryRepository {
    pool: DynDatabasePool,
}

impl SqlxCategoryRepository {
    /// Create a new SQLx category repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CategoryRepository> {
        Arc::new(Self::new(pool))
    }

    async fn fetch_all(&self, sql: &str, binds: Vec<Bind>) -> Result<Vec<Category>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => query::fetch_all_sqlite(self.pool.sqlite()?, sql, binds)
                .await?
                .iter()
                .map(row_to_category_sqlite)
                .collect(),
            DatabaseDriver::Mysql => query::fetch_all_mysql(self.pool.mysql()?, sql, binds)
                .await?
                .iter()
                .map(row_to_category_mysql)
                .collect(),
        }
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepository {
    async fn create(&self, name: &str) -> Result<Category> {
        let now = Utc::now();
        let id = query::insert(
            &self.pool,
            "INSERT INTO categories (name, created_at, updated_at) VALUES (?, ?, ?)",
            vec![name.into(), now.into(), now.into()],
        )
        .await
        .with_context(|| format!("Failed to create category {:?}", name))?;

        self.get_by_id(id)
            .await?
            .context("Category not found after insert")
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Category>> {
        let sql = format!("{} WHERE id = ?", SELECT_CATEGORY);
        Ok(self.fetch_all(&sql, vec![id.into()]).await?.into_iter().next())
    }

    async fn list_all(&self) -> Result<Vec<Category>> {
        let sql = format!("{} ORDER BY id", SELECT_CATEGORY);
        self.fetch_all(&sql, vec![]).await
    }
}

fn row_to_category_sqlite(row: &SqliteRow) -> Result<Category> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_category_mysql(row: &MySqlRow) -> Result<Category> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
