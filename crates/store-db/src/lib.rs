//! # store-db: Database Layer for the Store Backend
//!
//! This crate provides database access for the store backend.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Store Backend Data Flow                          │
//! │                                                                         │
//! │  HTTP handler (POST /api/checkout)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CheckoutEngine<TransactionRepository>   (store-core)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     store-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐  ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories    │  │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                  │  │  (embedded)  │  │   │
//! │  │   │               │    │ CategoryRepo     │  │              │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo      │  │ 001_init.sql │  │   │
//! │  │   │               │    │ TransactionRepo ─┼─►│              │  │   │
//! │  │   │               │    │  (unit of work)  │  │              │  │   │
//! │  │   └───────────────┘    └──────────────────┘  └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (DB_CONN)                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use store_core::{CheckoutEngine, CheckoutItem};
//! use store_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("store.db")).await?;
//!
//! let engine = CheckoutEngine::new(db.transactions());
//! let tx = engine.checkout(&[CheckoutItem::new(1, 2)]).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::product::ProductRepository;
pub use repository::transaction::{SqliteUnitOfWork, TransactionRepository};
