//! # Store API
//!
//! HTTP server for the store backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Store API Routes                                │
//! │                                                                         │
//! │  ┌────────────────────┐  ┌────────────────────┐  ┌───────────────────┐ │
//! │  │  /api/categories   │  │  /api/products     │  │  /api/checkout    │ │
//! │  │                    │  │                    │  │                   │ │
//! │  │ • list (?name=)    │  │ • list (?name=)    │  │ • POST cart       │ │
//! │  │ • create           │  │ • create           │  │                   │ │
//! │  │ • get/put/delete   │  │ • get/put/delete   │  │ /api/transactions │ │
//! │  └────────────────────┘  └────────────────────┘  │ • GET by id       │ │
//! │                                                  └───────────────────┘ │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         AppState                                  │  │
//! │  │   Database (SQLite pool)      CheckoutEngine<TransactionRepo>     │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (or `.env` / `store-api.toml`):
//! - `PORT` - HTTP port (default: 8080)
//! - `BASE_URL` - bind host (default: 0.0.0.0)
//! - `DB_CONN` - SQLite database path (default: store.db)
//! - `DB_MAX_OPEN_CONNECTION` - pool size (default: 5)

pub mod config;
pub mod error;
pub mod response;
pub mod routes;

use std::sync::Arc;

use store_core::CheckoutEngine;
use store_db::{Database, TransactionRepository};

// Re-exports
pub use config::ApiConfig;
pub use error::ApiError;
pub use routes::build_router;

/// Shared application state.
pub struct AppState {
    pub db: Database,
    pub checkout: CheckoutEngine<TransactionRepository>,
}

impl AppState {
    pub fn new(db: Database) -> Arc<Self> {
        let checkout = CheckoutEngine::new(db.transactions());
        Arc::new(AppState { db, checkout })
    }
}
