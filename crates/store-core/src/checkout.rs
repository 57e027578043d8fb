//! # Checkout Engine
//!
//! Turns a cart into stock decrements, a transaction header and itemized
//! details, all inside one atomic unit of work.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       CheckoutEngine::checkout                          │
//! │                                                                         │
//! │  items ──► quantities > 0? ── no ──► InvalidQuantity (no I/O at all)   │
//! │              │ yes                                                      │
//! │              ▼                                                          │
//! │  store.begin() ──► unit of work (write lock held from first statement) │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  fetch_products(distinct ids) ──► snapshot map                          │
//! │              │                                                          │
//! │              ▼  for each line, in cart order                            │
//! │  ┌────────────────────────────────────────────────┐                    │
//! │  │ missing?        ──► ProductNotFound            │                    │
//! │  │ stock < qty?    ──► InsufficientStock          │  any error:        │
//! │  │ price × qty     ──► subtotal, total (checked)  │  rollback, return  │
//! │  │ decrement_stock ──► snapshot.stock -= qty      │                    │
//! │  └────────────────────────────────────────────────┘                    │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  insert_transaction ──► id ──► stamp details ──► insert_details         │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  commit ──► Transaction                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine only talks to the collaborator traits below. store-db
//! implements them over a SQLite transaction; the tests in this module
//! implement them in memory.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::error::{CheckoutError, PersistenceResult};
use crate::money::Money;
use crate::types::{CheckoutItem, Product, ProductId, Transaction, TransactionDetail, TransactionId};

// =============================================================================
// Collaborator Traits
// =============================================================================

/// Reads product snapshots inside a unit of work.
#[async_trait]
pub trait ProductCatalog {
    /// Returns a snapshot for every id in `ids` that exists.
    ///
    /// Ids with no matching product are simply absent from the map. The
    /// snapshot must stay valid until the unit of work ends, i.e. no other
    /// checkout may change these rows in between.
    async fn fetch_products(
        &mut self,
        ids: &BTreeSet<ProductId>,
    ) -> PersistenceResult<HashMap<ProductId, Product>>;
}

/// Applies stock decrements inside a unit of work.
#[async_trait]
pub trait StockLedger {
    /// Lowers the stock of `product_id` by `quantity`.
    ///
    /// Does not check sufficiency; the engine has already done that against
    /// its snapshot. Fails if the row cannot be updated.
    async fn decrement_stock(&mut self, product_id: ProductId, quantity: i64)
        -> PersistenceResult<()>;
}

/// Persists the transaction header and its details inside a unit of work.
#[async_trait]
pub trait TransactionRecorder {
    /// Inserts the header and returns its newly assigned id.
    async fn insert_transaction(
        &mut self,
        total_amount: Money,
        created_at: DateTime<Utc>,
    ) -> PersistenceResult<TransactionId>;

    /// Inserts all details in one batch.
    async fn insert_details(&mut self, details: &[TransactionDetail]) -> PersistenceResult<()>;
}

/// One atomic checkout scope.
///
/// Dropping a unit without calling [`commit`](UnitOfWork::commit) must
/// discard everything it wrote.
#[async_trait]
pub trait UnitOfWork: ProductCatalog + StockLedger + TransactionRecorder + Send + Sized {
    async fn commit(self) -> PersistenceResult<()>;

    async fn rollback(self) -> PersistenceResult<()>;
}

/// Opens units of work.
#[async_trait]
pub trait CheckoutStore: Send + Sync {
    type Unit: UnitOfWork;

    async fn begin(&self) -> PersistenceResult<Self::Unit>;
}

// =============================================================================
// Checkout Engine
// =============================================================================

/// Validates carts and commits them atomically through a [`CheckoutStore`].
///
/// Holds no state of its own besides the store, so a single engine can be
/// shared across request tasks.
#[derive(Debug, Clone)]
pub struct CheckoutEngine<S> {
    store: S,
}

impl<S: CheckoutStore> CheckoutEngine<S> {
    pub fn new(store: S) -> Self {
        CheckoutEngine { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Checks out `items` as one transaction.
    ///
    /// ## Guarantees
    /// - On `Ok`: every stock decrement, the header and every detail are
    ///   committed together; `total_amount` equals the sum of subtotals.
    /// - On `Err`: nothing was committed.
    ///
    /// A product id appearing on several lines is treated as independent
    /// lines; each line sees the stock left by the lines before it.
    pub async fn checkout(&self, items: &[CheckoutItem]) -> Result<Transaction, CheckoutError> {
        debug!(item_count = items.len(), "starting checkout");

        if let Some(bad) = items.iter().find(|item| item.quantity <= 0) {
            let err = CheckoutError::InvalidQuantity {
                product_id: bad.product_id,
                quantity: bad.quantity,
            };
            warn!(error = %err, "checkout rejected");
            return Err(err);
        }

        let ids: BTreeSet<ProductId> = items.iter().map(|item| item.product_id).collect();

        let mut unit = self.store.begin().await.map_err(|e| {
            error!(error = %e, "failed to open checkout unit of work");
            CheckoutError::from(e)
        })?;

        let outcome = apply_items(&mut unit, items, &ids).await;

        match outcome {
            Ok(transaction) => {
                if let Err(e) = unit.commit().await {
                    error!(error = %e, "checkout commit failed");
                    return Err(e.into());
                }

                info!(
                    transaction_id = transaction.id,
                    total_amount = transaction.total_amount.cents(),
                    detail_count = transaction.details.len(),
                    "checkout committed"
                );
                Ok(transaction)
            }
            Err(err) => {
                if let Err(rollback_err) = unit.rollback().await {
                    warn!(error = %rollback_err, "checkout rollback failed");
                }

                if err.is_validation() {
                    warn!(error = %err, "checkout rejected");
                } else {
                    error!(error = %err, "checkout failed");
                }
                Err(err)
            }
        }
    }
}

/// Everything between `begin` and `commit`.
async fn apply_items<U: UnitOfWork>(
    unit: &mut U,
    items: &[CheckoutItem],
    ids: &BTreeSet<ProductId>,
) -> Result<Transaction, CheckoutError> {
    let mut snapshots = if ids.is_empty() {
        HashMap::new()
    } else {
        unit.fetch_products(ids).await?
    };

    let mut total = Money::zero();
    let mut details = Vec::with_capacity(items.len());

    for item in items {
        let product = snapshots
            .get_mut(&item.product_id)
            .ok_or(CheckoutError::ProductNotFound(item.product_id))?;

        if !product.has_stock_for(item.quantity) {
            return Err(CheckoutError::InsufficientStock {
                product_id: item.product_id,
                available: product.stock,
                requested: item.quantity,
            });
        }

        let overflow = || CheckoutError::AmountOverflow {
            product_id: item.product_id,
        };
        let subtotal = product
            .price
            .checked_multiply_quantity(item.quantity)
            .ok_or_else(overflow)?;
        total = total.checked_add(subtotal).ok_or_else(overflow)?;

        unit.decrement_stock(item.product_id, item.quantity).await?;
        product.stock -= item.quantity;

        details.push(TransactionDetail {
            transaction_id: 0,
            product_id: item.product_id,
            product_name: product.name.clone(),
            quantity: item.quantity,
            subtotal,
        });
    }

    let created_at = Utc::now();
    let transaction_id = unit.insert_transaction(total, created_at).await?;

    for detail in &mut details {
        detail.transaction_id = transaction_id;
    }
    if !details.is_empty() {
        unit.insert_details(&details).await?;
    }

    Ok(Transaction {
        id: transaction_id,
        total_amount: total,
        created_at,
        details,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
