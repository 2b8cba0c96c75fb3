//! # Validation Module
//!
//! Input validation for cart snapshots and admin-entered values.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Validation Layers                             │
//! │                                                                     │
//! │  Layer 1: Storefront (TypeScript)                                   │
//! │  ├── Basic format checks (empty, length)                            │
//! │  └── Immediate user feedback                                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: Request handler (Rust)                                    │
//! │  ├── Type validation (deserialization)                              │
//! │  └── THIS MODULE: business rule validation                          │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  └── NOT NULL / UNIQUE / foreign key constraints                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The evaluators call [`validate_cart`] up front: invalid input is rejected
//! before any tax or discount math runs, never partially computed.

use crate::error::ValidationError;
use crate::types::{CartLine, CartSnapshot};
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Cart Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (zero is allowed: free items)
pub fn validate_unit_price(line: &CartLine) -> ValidationResult<()> {
    if line.unit_price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "unit_price".to_string(),
        });
    }

    Ok(())
}

/// Validates a single cart line.
pub fn validate_line(line: &CartLine) -> ValidationResult<()> {
    if line.product_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product_id".to_string(),
        });
    }

    validate_quantity(line.quantity)?;
    validate_unit_price(line)?;

    Ok(())
}

/// Validates a full cart snapshot.
///
/// An empty cart is valid; it simply produces zero/None results downstream.
pub fn validate_cart(cart: &CartSnapshot) -> ValidationResult<()> {
    if cart.lines.len() > MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "cart lines".to_string(),
            min: 0,
            max: MAX_CART_LINES as i64,
        });
    }

    for line in &cart.lines {
        validate_line(line)?;
    }

    Ok(())
}

// =============================================================================
// Admin Input Validators
// =============================================================================

/// Validates a GST rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
/// - Real GST slabs are 0/500/1200/1800/2800 but any percentage is accepted
pub fn validate_gst_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "gst_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates a GSTIN.
///
/// ## Rules
/// - Can be empty (store not yet registered)
/// - Otherwise 15 alphanumeric characters
pub fn validate_gstin(gstin: &str) -> ValidationResult<()> {
    let gstin = gstin.trim();

    if gstin.is_empty() {
        return Ok(());
    }

    if gstin.len() != 15 || !gstin.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: "gstin".to_string(),
            reason: "must be 15 alphanumeric characters".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn line(qty: i64, price: i64) -> CartLine {
        CartLine {
            product_id: "p1".to_string(),
            category_id: None,
            quantity: qty,
            unit_price: Money::from_rupees(price),
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_line() {
        assert!(validate_line(&line(1, 100)).is_ok());
        assert!(validate_line(&line(1, 0)).is_ok());

        let mut bad = line(1, 100);
        bad.product_id = "  ".to_string();
        assert!(validate_line(&bad).is_err());

        let negative = CartLine {
            unit_price: Money::from_rupees(0) - Money::from_rupees(1),
            ..line(1, 0)
        };
        assert!(validate_line(&negative).is_err());
    }

    #[test]
    fn test_validate_cart_empty_is_ok() {
        assert!(validate_cart(&CartSnapshot::default()).is_ok());
    }

    #[test]
    fn test_validate_cart_too_many_lines() {
        let cart = CartSnapshot::new(vec![line(1, 10); MAX_CART_LINES + 1]);
        assert!(validate_cart(&cart).is_err());
    }

    #[test]
    fn test_validate_gst_rate_bps() {
        assert!(validate_gst_rate_bps(0).is_ok());
        assert!(validate_gst_rate_bps(1800).is_ok());
        assert!(validate_gst_rate_bps(10000).is_ok());
        assert!(validate_gst_rate_bps(10001).is_err());
    }

    #[test]
    fn test_validate_gstin() {
        assert!(validate_gstin("").is_ok());
        assert!(validate_gstin("22AAAAA0000A1Z5").is_ok());
        assert!(validate_gstin("too-short").is_err());
    }
}
