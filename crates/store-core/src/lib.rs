//! # store-core: Pure Business Logic for the Store Backend
//!
//! This crate is the **heart** of the store backend. It contains the domain
//! types, validation rules and the checkout engine, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Store Backend Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP (store-api, axum)                       │   │
//! │  │    /api/categories   /api/products   /api/checkout              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ store-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ checkout  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  Engine   │  │   rules   │  │   │
//! │  │   │Transaction│  │           │  │  traits   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CheckoutStore / UnitOfWork traits      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    store-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, Transaction, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation for catalog writes
//! - [`checkout`] - The checkout engine and its collaborator traits
//!
//! ## Example Usage
//!
//! ```rust
//! use store_core::money::Money;
//!
//! let price = Money::from_cents(1099);
//! let subtotal = price.checked_multiply_quantity(3).unwrap();
//! assert_eq!(subtotal.cents(), 3297);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::{
    CheckoutEngine, CheckoutStore, ProductCatalog, StockLedger, TransactionRecorder, UnitOfWork,
};
pub use error::{CheckoutError, PersistenceError, PersistenceResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product or category name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of a category description.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;
