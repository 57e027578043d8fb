//! # Error Types
//!
//! Domain-specific error types for store-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  store-core errors (this file)                                         │
//! │  ├── ValidationError   - Input validation failures                     │
//! │  ├── CheckoutError     - Checkout outcome (validation | persistence)   │
//! │  └── PersistenceError  - Opaque storage failure seen by the engine     │
//! │                                                                         │
//! │  store-db errors (separate crate)                                      │
//! │  └── DbError           - Database operation failures                   │
//! │                                                                         │
//! │  store-api errors (in app)                                             │
//! │  └── ApiError          - What HTTP clients see                         │
//! │                                                                         │
//! │  Flow: DbError → PersistenceError → CheckoutError → ApiError           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::error::Error as StdError;

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation of catalog writes before they reach the database.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Persistence Error
// =============================================================================

/// An infrastructural failure reported by a checkout collaborator.
///
/// The engine does not know which storage engine sits behind the traits, so
/// the original failure is kept as a boxed source for diagnostics.
#[derive(Debug, Error)]
#[error("{context}: {source}")]
pub struct PersistenceError {
    context: String,
    #[source]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

impl PersistenceError {
    /// Wraps a storage error with a short description of the failed step.
    pub fn new(
        context: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
    ) -> Self {
        PersistenceError {
            context: context.into(),
            source: source.into(),
        }
    }

    /// The step that failed (e.g. "decrement stock").
    pub fn context(&self) -> &str {
        &self.context
    }
}

/// Result type for checkout collaborator operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

// =============================================================================
// Checkout Error
// =============================================================================

/// Why a checkout was rejected.
///
/// Every variant is returned only after the unit of work has been rolled
/// back, so none of them leave persisted side effects.
///
/// ## Categories
/// ```text
/// Validation (caller can fix the cart and retry)
///   ProductNotFound, InsufficientStock, InvalidQuantity, AmountOverflow
///
/// Infrastructure (caller may resubmit the same cart)
///   Persistence
/// ```
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart references a product that does not exist.
    #[error("product id {0} not found")]
    ProductNotFound(ProductId),

    /// Requested quantity exceeds the stock available at validation time.
    #[error("product id {product_id} is out of stock: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },

    /// A line item quantity is zero or negative.
    #[error("quantity for product id {product_id} must be positive, got {quantity}")]
    InvalidQuantity { product_id: ProductId, quantity: i64 },

    /// Subtotal or total does not fit in the money type.
    #[error("amount overflow while pricing product id {product_id}")]
    AmountOverflow { product_id: ProductId },

    /// Storage read, write or commit failed.
    #[error("checkout persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

impl CheckoutError {
    /// Returns true for errors caused by the cart's content.
    pub fn is_validation(&self) -> bool {
        !matches!(self, CheckoutError::Persistence(_))
    }

    /// The product that triggered a validation error, if any.
    pub fn product_id(&self) -> Option<ProductId> {
        match self {
            CheckoutError::ProductNotFound(id) => Some(*id),
            CheckoutError::InsufficientStock { product_id, .. }
            | CheckoutError::InvalidQuantity { product_id, .. }
            | CheckoutError::AmountOverflow { product_id } => Some(*product_id),
            CheckoutError::Persistence(_) => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_error_messages() {
        let err = CheckoutError::InsufficientStock {
            product_id: 7,
            available: 2,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "product id 7 is out of stock: available 2, requested 3"
        );

        let err = CheckoutError::ProductNotFound(999);
        assert_eq!(err.to_string(), "product id 999 not found");
    }

    #[test]
    fn test_checkout_error_categories() {
        assert!(CheckoutError::ProductNotFound(1).is_validation());
        assert!(CheckoutError::InvalidQuantity {
            product_id: 1,
            quantity: 0
        }
        .is_validation());

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err: CheckoutError = PersistenceError::new("commit", io).into();
        assert!(!err.is_validation());
        assert_eq!(err.product_id(), None);
    }

    #[test]
    fn test_persistence_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "locked");
        let err = PersistenceError::new("fetch products", io);
        assert_eq!(err.context(), "fetch products");
        assert_eq!(err.to_string(), "fetch products: locked");
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::TooLong {
            field: "description".to_string(),
            max: 1000,
        };
        assert_eq!(err.to_string(), "description must be at most 1000 characters");
    }
}
