//! # Category Repository
//!
//! Database operations for categories. Categories are catalog metadata only;
//! nothing in the checkout path reads them.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::like_filter;
use store_core::{Category, CategoryId, CategoryInput};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists categories ordered by id, optionally filtered by a name
    /// substring. Matching ignores case for ASCII letters only (SQLite `LIKE`).
    pub async fn list(&self, name_filter: Option<&str>) -> DbResult<Vec<Category>> {
        let categories = match like_filter(name_filter) {
            Some(term) => {
                debug!(filter = %term, "Listing categories by name");
                sqlx::query_as::<_, Category>(
                    r#"
                    SELECT id, name, description
                    FROM categories
                    WHERE name LIKE '%' || ?1 || '%' ESCAPE '\'
                    ORDER BY id
                    "#,
                )
                .bind(term)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Category>(
                    "SELECT id, name, description FROM categories ORDER BY id",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(categories)
    }

    /// Gets a category by its ID.
    pub async fn get_by_id(&self, id: CategoryId) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Inserts a new category and returns it with its assigned id.
    pub async fn insert(&self, input: &CategoryInput) -> DbResult<Category> {
        debug!(name = %input.name, "Inserting category");

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description)
            VALUES (?1, ?2)
            RETURNING id, name, description
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Replaces a category's fields.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no category with this id
    pub async fn update(&self, id: CategoryId, input: &CategoryInput) -> DbResult<Category> {
        debug!(id, "Updating category");

        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET name = ?2, description = ?3
            WHERE id = ?1
            RETURNING id, name, description
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(&input.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Category", id))
    }

    /// Deletes a category.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no category with this id
    pub async fn delete(&self, id: CategoryId) -> DbResult<()> {
        debug!(id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
