//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD operations
//! - Case-insensitive name search
//!
//! Stock is only ever lowered by the checkout unit of work
//! ([`SqliteUnitOfWork`](crate::SqliteUnitOfWork)); this repository sets it
//! wholesale on create/update.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::like_filter;
use store_core::{Product, ProductId, ProductInput};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let matches = repo.list(Some("kopi")).await?;
/// let product = repo.get_by_id(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products ordered by id.
    ///
    /// ## Arguments
    /// * `name_filter` - substring of the name; `None` or blank returns
    ///   every product. Case folding follows SQLite `LIKE`, which only folds
    ///   ASCII letters: "kopi" finds "Kopi", but "éclair" misses "Éclair".
    pub async fn list(&self, name_filter: Option<&str>) -> DbResult<Vec<Product>> {
        let products = match like_filter(name_filter) {
            Some(term) => {
                debug!(filter = %term, "Searching products by name");
                sqlx::query_as::<_, Product>(
                    r#"
                    SELECT id, name, price, stock
                    FROM products
                    WHERE name LIKE '%' || ?1 || '%' ESCAPE '\'
                    ORDER BY id
                    "#,
                )
                .bind(term)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>("SELECT id, name, price, stock FROM products ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: ProductId) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, stock FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product and returns it with its assigned id.
    ///
    /// ## Returns
    /// * `Err(DbError::CheckViolation)` - negative price or stock slipped
    ///   past validation
    pub async fn insert(&self, input: &ProductInput) -> DbResult<Product> {
        debug!(name = %input.name, "Inserting product");

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, stock)
            VALUES (?1, ?2, ?3)
            RETURNING id, name, price, stock
            "#,
        )
        .bind(input.name.trim())
        .bind(input.price.cents())
        .bind(input.stock)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    /// Replaces a product's name, price and stock.
    ///
    /// ## Returns
    /// * `Ok(Product)` - the updated row
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: ProductId, input: &ProductInput) -> DbResult<Product> {
        debug!(id, "Updating product");

        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET name = ?2, price = ?3, stock = ?4
            WHERE id = ?1
            RETURNING id, name, price, stock
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(input.price.cents())
        .bind(input.stock)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    /// * `Err(DbError::ForeignKeyViolation)` - transaction history still
    ///   references it
    pub async fn delete(&self, id: ProductId) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
