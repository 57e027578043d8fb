//! # Repository Module
//!
//! Database repository implementations for the store backend.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.products().list(Some("kopi"))                              │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list(&self, name_filter)                                          │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, input)                                              │
//! │  ├── update(&self, id, input)                                          │
//! │  └── delete(&self, id)                                                 │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`](category::CategoryRepository) - Category CRUD
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD and name search
//! - [`TransactionRepository`](transaction::TransactionRepository) - Checkout
//!   unit of work and transaction lookup

pub mod category;
pub mod product;
pub mod transaction;

/// Turns an optional search term into a `LIKE` argument, or `None` for "all".
///
/// `%` and `_` in the term are matched literally (the queries use
/// `ESCAPE '\'`).
pub(crate) fn like_filter(name_filter: Option<&str>) -> Option<String> {
    let term = name_filter.map(str::trim).filter(|t| !t.is_empty())?;
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(escaped)
}
