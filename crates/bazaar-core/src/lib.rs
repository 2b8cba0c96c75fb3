//! # bazaar-core: Pure Pricing Logic for the Bazaar Storefront
//!
//! This crate is the **heart** of the Bazaar checkout. It contains the tax
//! calculator and the campaign evaluator as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Bazaar Checkout Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront (TypeScript)                      │   │
//! │  │     Cart UI ──► Checkout UI ──► Order Summary                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP (JSON)                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 checkout-api (Axum handlers)                    │   │
//! │  │     POST /api/cart/tax, POST /api/cart/campaigns                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bazaar-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   money   │  │    tax    │  │ campaign  │  │ validation│   │   │
//! │  │   │   Money   │  │ GST split │  │ evaluator │  │   rules   │   │   │
//! │  │   │  GstRate  │  │ incl/excl │  │  nearest  │  │  checks   │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   bazaar-db (Database Layer)                    │   │
//! │  │          SQLite queries, migrations, repositories               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CartSnapshot, TaxSettings, GstRate, etc.)
//! - [`money`] - Money type backed by exact decimal arithmetic
//! - [`tax`] - GST calculator (CGST/SGST vs IGST, inclusive/exclusive)
//! - [`campaign`] - Campaign evaluator (rules, best match, nearest)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every evaluator is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Exact Money**: Monetary values use `rust_decimal`, never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use bazaar_core::money::Money;
//! use bazaar_core::tax::{calculate_tax, TaxType};
//! use bazaar_core::types::{CartLine, CartSnapshot, TaxSettings};
//! use std::collections::HashMap;
//!
//! let cart = CartSnapshot::new(vec![CartLine {
//!     product_id: "p1".to_string(),
//!     category_id: None,
//!     quantity: 1,
//!     unit_price: Money::from_rupees(1000),
//! }]);
//!
//! let settings = TaxSettings {
//!     store_state: "Maharashtra".to_string(),
//!     ..TaxSettings::default()
//! };
//!
//! // Delivery to another state: the whole tax is IGST
//! let bd = calculate_tax(&cart, "Karnataka", &settings, &HashMap::new()).unwrap();
//! assert_eq!(bd.tax_type, TaxType::InterState);
//! assert_eq!(bd.igst, Money::from_rupees(180));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod campaign;
pub mod error;
pub mod money;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use bazaar_core::Money` instead of
// `use bazaar_core::money::Money`

pub use campaign::{
    AppliedCampaign, AppliesTo, Campaign, CampaignAction, CampaignOutcome, CampaignRule,
    CampaignStatus, DiscountType, EffectiveStatus, NearestCampaign, ProductCollections, RuleValue,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use tax::{TaxBreakdown, TaxType};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart snapshot
///
/// ## Business Reason
/// Bounds evaluation cost per request and keeps payload sizes sane.
/// Can be made configurable per-store in future versions.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
