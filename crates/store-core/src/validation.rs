//! # Validation Module
//!
//! Input validation for catalog writes.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum Json)                                   │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Business rule validation (names, prices, stock)                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── CHECK (price >= 0), CHECK (stock >= 0)                            │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Checkout quantities are validated by the checkout engine itself, which
//! reports them as [`CheckoutError::InvalidQuantity`](crate::CheckoutError).
//!
//! ## Usage
//! ```rust
//! use store_core::money::Money;
//! use store_core::types::ProductInput;
//! use store_core::validation::validate_product_input;
//!
//! let input = ProductInput {
//!     name: "Kopi Susu".to_string(),
//!     price: Money::from_cents(15000),
//!     stock: 10,
//! };
//! assert!(validate_product_input(&input).is_ok());
//! ```

use crate::error::ValidationError;
use crate::types::{CategoryInput, ProductInput};
use crate::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product or category name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 200 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates a category description. Empty is allowed.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LENGTH,
        });
    }

    Ok(())
}

/// Validates a search filter. Returns the trimmed filter.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price. Zero is allowed (free items).
///
/// ```rust
/// use store_core::validation::validate_price;
///
/// assert!(validate_price(1099).is_ok());
/// assert!(validate_price(0).is_ok());
/// assert!(validate_price(-100).is_err());
/// ```
pub fn validate_price(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Payload Validators
// =============================================================================

pub fn validate_product_input(input: &ProductInput) -> ValidationResult<()> {
    validate_name(&input.name)?;
    validate_price(input.price.cents())?;
    validate_stock(input.stock)
}

pub fn validate_category_input(input: &CategoryInput) -> ValidationResult<()> {
    validate_name(&input.name)?;
    validate_description(&input.description)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Kopi Susu").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"A".repeat(200)).is_ok());
        assert!(validate_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_name_counts_chars_not_bytes() {
        // 200 two-byte characters is still within the limit
        assert!(validate_name(&"é".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(12).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_product_input() {
        let mut input = ProductInput {
            name: "Teh".to_string(),
            price: Money::from_cents(5000),
            stock: 3,
        };
        assert!(validate_product_input(&input).is_ok());

        input.price = Money::from_cents(-1);
        let err = validate_product_input(&input).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { ref field, .. } if field == "price"));
    }

    #[test]
    fn test_validate_category_input() {
        let input = CategoryInput {
            name: "Animal".to_string(),
            description: "x".repeat(1001),
        };
        let err = validate_category_input(&input).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 1000, .. }));
    }

    #[test]
    fn test_validate_search_query_trims() {
        assert_eq!(validate_search_query("  kopi ").unwrap(), "kopi");
    }
}
