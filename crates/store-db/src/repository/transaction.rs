//! # Transaction Repository
//!
//! SQLite implementation of the checkout collaborators plus lookup of
//! committed transactions.
//!
//! ## Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SQLite has no SELECT ... FOR UPDATE. Instead, the first statement of  │
//! │  every checkout unit of work is a write on the cart's product rows:    │
//! │                                                                         │
//! │     UPDATE products SET stock = stock WHERE id IN (...)                │
//! │                                                                         │
//! │  That takes the database write lock BEFORE the snapshot is read.       │
//! │                                                                         │
//! │  Checkout A ──► BEGIN ──► lock ✓ ──► SELECT ──► ... ──► COMMIT         │
//! │  Checkout B ──► BEGIN ──► lock ⏳ (busy_timeout) ──────────► lock ✓ ──► │
//! │                                                    SELECT sees A's      │
//! │                                                    decrements           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use store_core::{
    CheckoutStore, Money, PersistenceResult, Product, ProductCatalog, ProductId, StockLedger,
    Transaction, TransactionDetail, TransactionId, TransactionRecorder, UnitOfWork,
};

/// Rows per multi-row detail INSERT. Five bound values per row keeps each
/// statement well under SQLite's host parameter limit.
const DETAIL_ROWS_PER_INSERT: usize = 1000;

/// Product ids bound into one `IN (...)` list. Large carts are split across
/// several statements inside the same unit of work.
const IDS_PER_STATEMENT: usize = 900;

// =============================================================================
// Transaction Repository
// =============================================================================

/// Repository for transactions; also the [`CheckoutStore`] the checkout
/// engine runs against.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Gets a committed transaction with its details in checkout order.
    pub async fn get_by_id(&self, id: TransactionId) -> DbResult<Option<Transaction>> {
        let header = sqlx::query_as::<_, (TransactionId, i64, DateTime<Utc>)>(
            "SELECT id, total_amount, created_at FROM transactions WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some((id, total_amount, created_at)) = header else {
            return Ok(None);
        };

        let details = sqlx::query_as::<_, TransactionDetail>(
            r#"
            SELECT transaction_id, product_id, product_name, quantity, subtotal
            FROM transaction_details
            WHERE transaction_id = ?1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Transaction {
            id,
            total_amount: Money::from_cents(total_amount),
            created_at,
            details,
        }))
    }

    /// Counts committed transactions (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl CheckoutStore for TransactionRepository {
    type Unit = SqliteUnitOfWork;

    async fn begin(&self) -> PersistenceResult<SqliteUnitOfWork> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(SqliteUnitOfWork { tx })
    }
}

// =============================================================================
// Unit of Work
// =============================================================================

/// One checkout, backed by one SQLite transaction.
///
/// Dropping it without [`commit`](UnitOfWork::commit) rolls back: sqlx
/// issues the ROLLBACK when the connection returns to the pool.
pub struct SqliteUnitOfWork {
    tx: sqlx::Transaction<'static, Sqlite>,
}

impl SqliteUnitOfWork {
    /// Claims the write lock for the rest of this transaction.
    ///
    /// The first chunk already takes the lock; later chunks only touch rows.
    async fn lock_rows(&mut self, ids: &[ProductId]) -> DbResult<()> {
        for chunk in ids.chunks(IDS_PER_STATEMENT) {
            let mut qb =
                QueryBuilder::<Sqlite>::new("UPDATE products SET stock = stock WHERE id IN (");
            push_id_list(&mut qb, chunk);
            qb.build().execute(&mut *self.tx).await?;
        }
        Ok(())
    }

    async fn select_products(&mut self, ids: &[ProductId]) -> DbResult<Vec<Product>> {
        let mut products = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(IDS_PER_STATEMENT) {
            let mut qb = QueryBuilder::<Sqlite>::new(
                "SELECT id, name, price, stock FROM products WHERE id IN (",
            );
            push_id_list(&mut qb, chunk);

            let rows = qb
                .build_query_as::<Product>()
                .fetch_all(&mut *self.tx)
                .await?;
            products.extend(rows);
        }
        Ok(products)
    }
}

/// Appends `?, ?, ...)` bound to `ids`.
fn push_id_list(qb: &mut QueryBuilder<'_, Sqlite>, ids: &[ProductId]) {
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

#[async_trait]
impl ProductCatalog for SqliteUnitOfWork {
    async fn fetch_products(
        &mut self,
        ids: &BTreeSet<ProductId>,
    ) -> PersistenceResult<HashMap<ProductId, Product>> {
        let ids: Vec<ProductId> = ids.iter().copied().collect();

        self.lock_rows(&ids).await?;
        let rows = self.select_products(&ids).await?;

        debug!(requested = ids.len(), found = rows.len(), "Fetched checkout snapshot");
        Ok(rows.into_iter().map(|p| (p.id, p)).collect())
    }
}

#[async_trait]
impl StockLedger for SqliteUnitOfWork {
    async fn decrement_stock(
        &mut self,
        product_id: ProductId,
        quantity: i64,
    ) -> PersistenceResult<()> {
        let result = sqlx::query("UPDATE products SET stock = stock - ?1 WHERE id = ?2")
            .bind(quantity)
            .bind(product_id)
            .execute(&mut *self.tx)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product_id).into());
        }

        Ok(())
    }
}

#[async_trait]
impl TransactionRecorder for SqliteUnitOfWork {
    async fn insert_transaction(
        &mut self,
        total_amount: Money,
        created_at: DateTime<Utc>,
    ) -> PersistenceResult<TransactionId> {
        let id: TransactionId = sqlx::query_scalar(
            "INSERT INTO transactions (total_amount, created_at) VALUES (?1, ?2) RETURNING id",
        )
        .bind(total_amount.cents())
        .bind(created_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(DbError::from)?;

        Ok(id)
    }

    async fn insert_details(&mut self, details: &[TransactionDetail]) -> PersistenceResult<()> {
        for chunk in details.chunks(DETAIL_ROWS_PER_INSERT) {
            let mut qb = QueryBuilder::<Sqlite>::new(
                "INSERT INTO transaction_details \
                 (transaction_id, product_id, product_name, quantity, subtotal) ",
            );
            qb.push_values(chunk, |mut row, detail| {
                row.push_bind(detail.transaction_id)
                    .push_bind(detail.product_id)
                    .push_bind(detail.product_name.as_str())
                    .push_bind(detail.quantity)
                    .push_bind(detail.subtotal.cents());
            });

            qb.build()
                .execute(&mut *self.tx)
                .await
                .map_err(DbError::from)?;
        }

        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for SqliteUnitOfWork {
    async fn commit(self) -> PersistenceResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        Ok(())
    }

    async fn rollback(self) -> PersistenceResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use std::sync::Arc;
    use store_core::{CheckoutEngine, CheckoutError, CheckoutItem, ProductInput};

    async fn seeded(db: &Database, products: &[(&str, i64, i64)]) -> Vec<Product> {
        let mut out = Vec::new();
        for &(name, price, stock) in products {
            let product = db
                .products()
                .insert(&ProductInput {
                    name: name.to_string(),
                    price: Money::from_cents(price),
                    stock,
                })
                .await
                .unwrap();
            out.push(product);
        }
        out
    }

    async fn stock_of(db: &Database, id: ProductId) -> i64 {
        db.products().get_by_id(id).await.unwrap().unwrap().stock
    }

    #[tokio::test]
    async fn test_checkout_persists_everything() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let p = seeded(&db, &[("Kopi", 15000, 10), ("Teh", 5000, 5)]).await;
        let engine = CheckoutEngine::new(db.transactions());

        let tx = engine
            .checkout(&[CheckoutItem::new(p[0].id, 3), CheckoutItem::new(p[1].id, 5)])
            .await
            .unwrap();

        assert_eq!(tx.total_amount.cents(), 3 * 15000 + 5 * 5000);
        assert_eq!(stock_of(&db, p[0].id).await, 7);
        assert_eq!(stock_of(&db, p[1].id).await, 0);

        let stored = db.transactions().get_by_id(tx.id).await.unwrap().unwrap();
        assert_eq!(stored.id, tx.id);
        assert_eq!(stored.total_amount, tx.total_amount);
        assert_eq!(stored.details, tx.details);
        assert_eq!(stored.created_at.timestamp(), tx.created_at.timestamp());
    }

    #[tokio::test]
    async fn test_insufficient_stock_rolls_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let p = seeded(&db, &[("Kopi", 15000, 10), ("Teh", 5000, 2)]).await;
        let engine = CheckoutEngine::new(db.transactions());

        let err = engine
            .checkout(&[CheckoutItem::new(p[0].id, 4), CheckoutItem::new(p[1].id, 3)])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::InsufficientStock { available: 2, requested: 3, .. }
        ));
        assert_eq!(stock_of(&db, p[0].id).await, 10);
        assert_eq!(stock_of(&db, p[1].id).await, 2);
        assert_eq!(db.transactions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_large_cart_of_unknown_ids_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let engine = CheckoutEngine::new(db.transactions());

        let items: Vec<CheckoutItem> = (1..=40_000).map(|id| CheckoutItem::new(id, 1)).collect();
        let err = engine.checkout(&items).await.unwrap_err();

        assert!(matches!(err, CheckoutError::ProductNotFound(1)));
        assert_eq!(db.transactions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_large_cart_spanning_several_statements() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let count = IDS_PER_STATEMENT * 2 + 300;
        let names: Vec<String> = (0..count).map(|i| format!("Item {i}")).collect();
        let specs: Vec<(&str, i64, i64)> = names.iter().map(|n| (n.as_str(), 100, 2)).collect();
        let products = seeded(&db, &specs).await;
        let engine = CheckoutEngine::new(db.transactions());

        let items: Vec<CheckoutItem> = products.iter().map(|p| CheckoutItem::new(p.id, 1)).collect();
        let tx = engine.checkout(&items).await.unwrap();

        assert_eq!(tx.details.len(), count);
        assert_eq!(tx.total_amount.cents(), 100 * count as i64);
        assert_eq!(stock_of(&db, products[0].id).await, 1);
        assert_eq!(stock_of(&db, products[count - 1].id).await, 1);

        let stored = db.transactions().get_by_id(tx.id).await.unwrap().unwrap();
        assert_eq!(stored.details.len(), count);
    }

    #[tokio::test]
    async fn test_unknown_product_rolls_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let p = seeded(&db, &[("Kopi", 15000, 10)]).await;
        let engine = CheckoutEngine::new(db.transactions());

        let err = engine
            .checkout(&[CheckoutItem::new(p[0].id, 1), CheckoutItem::new(999, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::ProductNotFound(999)));
        assert_eq!(stock_of(&db, p[0].id).await, 10);
        assert_eq!(db.transactions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_cart_records_header_only() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let engine = CheckoutEngine::new(db.transactions());

        let tx = engine.checkout(&[]).await.unwrap();
        let stored = db.transactions().get_by_id(tx.id).await.unwrap().unwrap();
        assert_eq!(stored.total_amount, Money::zero());
        assert!(stored.details.is_empty());
    }

    #[tokio::test]
    async fn test_dropped_unit_of_work_rolls_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let p = seeded(&db, &[("Kopi", 15000, 10)]).await;
        let repo = db.transactions();

        {
            let mut unit = repo.begin().await.unwrap();
            unit.decrement_stock(p[0].id, 4).await.unwrap();
            unit.insert_transaction(Money::from_cents(60000), Utc::now())
                .await
                .unwrap();
        }

        assert_eq!(stock_of(&db, p[0].id).await, 10);
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_decrement_missing_product_fails() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut unit = db.transactions().begin().await.unwrap();

        let err = unit.decrement_stock(12345, 1).await.unwrap_err();
        assert!(err.to_string().contains("Product not found: 12345"));
        unit.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_get_missing_transaction() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.transactions().get_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checkouts_for_last_unit() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("store.db")).max_connections(4))
            .await
            .unwrap();
        let p = seeded(&db, &[("Last One", 15000, 1)]).await;
        let id = p[0].id;

        let engine = Arc::new(CheckoutEngine::new(db.transactions()));
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let engine = engine.clone();
                tokio::spawn(async move { engine.checkout(&[CheckoutItem::new(id, 1)]).await })
            })
            .collect();

        let mut successes = 0;
        let mut out_of_stock = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(CheckoutError::InsufficientStock { .. }) => out_of_stock += 1,
                Err(other) => panic!("unexpected checkout error: {other}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(out_of_stock, 1);
        assert_eq!(stock_of(&db, id).await, 0);
        assert_eq!(db.transactions().count().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checkouts_never_oversell() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("store.db")).max_connections(4))
            .await
            .unwrap();
        let p = seeded(&db, &[("Kopi", 100, 5)]).await;
        let id = p[0].id;

        let engine = Arc::new(CheckoutEngine::new(db.transactions()));
        let handles: Vec<_> = (0..12)
            .map(|_| {
                let engine = engine.clone();
                tokio::spawn(async move { engine.checkout(&[CheckoutItem::new(id, 1)]).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(CheckoutError::InsufficientStock { .. }) => {}
                Err(other) => panic!("unexpected checkout error: {other}"),
            }
        }

        assert_eq!(successes, 5);
        assert_eq!(stock_of(&db, id).await, 0);
        assert_eq!(db.transactions().count().await.unwrap(), 5);
    }
}
