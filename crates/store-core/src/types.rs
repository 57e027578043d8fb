//! # Domain Types
//!
//! Core domain types used throughout the store backend.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │    Category     │   │    Product      │   │    Transaction       │  │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────────  │  │
//! │  │  id             │   │  id             │   │  id                  │  │
//! │  │  name           │   │  name           │   │  total_amount        │  │
//! │  │  description    │   │  price (Money)  │   │  created_at          │  │
//! │  └─────────────────┘   │  stock (>= 0)   │   │  details ──┐         │  │
//! │                        └────────▲────────┘   └────────────┼─────────┘  │
//! │                                 │                         ▼            │
//! │  ┌─────────────────┐            │            ┌──────────────────────┐  │
//! │  │  CheckoutItem   │────────────┘            │  TransactionDetail   │  │
//! │  │  product_id     │  (input only)           │  product_name        │  │
//! │  │  quantity (> 0) │                         │  quantity, subtotal  │  │
//! │  └─────────────────┘                         └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identifiers are SQLite `INTEGER PRIMARY KEY` values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

pub type ProductId = i64;
pub type CategoryId = i64;
pub type TransactionId = i64;

// =============================================================================
// Category
// =============================================================================

/// A product category. Catalog metadata only; checkout never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
}

/// Create/update payload for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: ProductId,

    /// Display name, copied onto each transaction detail at checkout.
    pub name: String,

    /// Unit price in the smallest currency unit.
    pub price: Money,

    /// Units on hand. Never negative.
    pub stock: i64,
}

impl Product {
    /// Checks whether `quantity` units can be taken from current stock.
    #[inline]
    pub fn has_stock_for(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

/// Create/update payload for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: Money,
    pub stock: i64,
}

// =============================================================================
// Checkout Input
// =============================================================================

/// One line of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl CheckoutItem {
    pub fn new(product_id: ProductId, quantity: i64) -> Self {
        CheckoutItem {
            product_id,
            quantity,
        }
    }
}

/// HTTP body for `POST /api/checkout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
}

// =============================================================================
// Transaction
// =============================================================================

/// A committed checkout.
///
/// `total_amount` always equals the sum of the detail subtotals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub total_amount: Money,
    pub created_at: DateTime<Utc>,
    pub details: Vec<TransactionDetail>,
}

/// One itemized line of a transaction.
///
/// `product_name` is the name at checkout time; later renames of the product
/// do not change history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionDetail {
    pub transaction_id: TransactionId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub subtotal: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
