//! # Error Types
//!
//! Domain-specific error types for bazaar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  bazaar-core errors (this file)                                     │
//! │  ├── CoreError        - Evaluation failures                         │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  bazaar-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  checkout-api errors (in app)                                       │
//! │  └── ApiError         - What the storefront sees (serialized)       │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → ApiError → {success: false}    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Errors are enum variants, never String
//! 3. Business no-match conditions (no campaign applies, tax disabled) are
//!    NOT errors - they are legitimate zero/None results

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Evaluation errors.
///
/// The evaluators never fail for expected business conditions. The only
/// failure mode is genuinely invalid input, which is rejected before any
/// partial computation happens.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Caller input failed validation (negative price, zero quantity, ...).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before the evaluators run.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., unparsable amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
