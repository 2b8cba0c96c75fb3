//! # Domain Types
//!
//! Core domain types shared by the tax calculator and campaign evaluator.
//!
//! ## Type Hierarchy
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                                 │
//! │                                                                       │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐         │
//! │  │   CartLine     │   │  TaxSettings   │   │ CategoryTaxRule│         │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │         │
//! │  │  product_id    │   │  tax_enabled   │   │  category_id   │         │
//! │  │  category_id?  │   │  tax_mode      │   │  rate (bps)    │         │
//! │  │  quantity      │   │  default_rate  │   └────────────────┘         │
//! │  │  unit_price    │   │  store_state   │                              │
//! │  └────────────────┘   │  gstin         │   ┌────────────────┐         │
//! │                       └────────────────┘   │    GstRate     │         │
//! │  ┌────────────────┐                        │  ────────────  │         │
//! │  │  CartSnapshot  │                        │  bps (u32)     │         │
//! │  │  lines, Σqty,  │                        │  1800 = 18%    │         │
//! │  │  Σ line totals │                        └────────────────┘         │
//! │  └────────────────┘                                                   │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// GST Rate
// =============================================================================

/// GST rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (the most common GST slab)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GstRate(u32);

impl GstRate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        GstRate(bps)
    }

    /// Creates a rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        GstRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the rate as an exact fraction (1800 bps → 0.18).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        Decimal::new(self.0 as i64, 4)
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        GstRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for GstRate {
    fn default() -> Self {
        GstRate::zero()
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A single line in a cart snapshot.
///
/// Prices are frozen at the time the snapshot is taken; the evaluators never
/// re-fetch product data mid-computation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    /// Product this line refers to.
    pub product_id: String,

    /// Category of the product, when known. Drives per-category GST
    /// overrides and `category` campaign rules.
    pub category_id: Option<String>,

    /// Quantity ordered. Must be positive.
    pub quantity: i64,

    /// Unit price as listed. Whether it contains tax depends on
    /// [`TaxMode`].
    pub unit_price: Money,
}

impl CartLine {
    /// Line amount as listed (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// An immutable snapshot of a cart, the unit of evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
}

impl CartSnapshot {
    pub fn new(lines: Vec<CartLine>) -> Self {
        CartSnapshot { lines }
    }

    /// Total quantity across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of listed line amounts.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(|l| l.line_total()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Tax Settings
// =============================================================================

/// Whether listed prices already contain tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    /// Listed price + tax shown separately.
    Exclusive,
    /// Listed price includes tax (MRP model).
    Inclusive,
}

impl Default for TaxMode {
    fn default() -> Self {
        TaxMode::Exclusive
    }
}

/// Store-wide tax configuration.
///
/// A singleton owned by the admin settings page. The calculator receives it
/// as an explicit parameter so the core logic stays side-effect-free and
/// testable without a database.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxSettings {
    /// Master switch. When off, breakdowns are all-zero.
    pub tax_enabled: bool,

    /// Inclusive (MRP) or exclusive pricing.
    pub tax_mode: TaxMode,

    /// Fallback GST rate for lines without a category override.
    pub default_rate: GstRate,

    /// State the store is registered in. Intra-state deliveries split tax
    /// into CGST + SGST; everything else is IGST.
    pub store_state: String,

    /// GST identification number of the store.
    pub gstin: String,
}

impl Default for TaxSettings {
    fn default() -> Self {
        TaxSettings {
            tax_enabled: true,
            tax_mode: TaxMode::Exclusive,
            default_rate: GstRate::from_bps(1800),
            store_state: String::new(),
            gstin: String::new(),
        }
    }
}

// =============================================================================
// Category Tax Rule
// =============================================================================

/// Per-category GST override. One rule per category.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryTaxRule {
    pub category_id: String,
    pub rate: GstRate,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gst_rate_from_bps() {
        let rate = GstRate::from_bps(1800);
        assert_eq!(rate.bps(), 1800);
        assert!((rate.percentage() - 18.0).abs() < 0.001);
        assert_eq!(rate.fraction(), "0.18".parse().unwrap());
    }

    #[test]
    fn test_gst_rate_from_percentage() {
        let rate = GstRate::from_percentage(5.0);
        assert_eq!(rate.bps(), 500);
    }

    #[test]
    fn test_cart_line_total() {
        let line = CartLine {
            product_id: "p1".to_string(),
            category_id: None,
            quantity: 3,
            unit_price: Money::from_rupees_paise(2, 50),
        };
        assert_eq!(line.line_total(), Money::from_rupees_paise(7, 50));
    }

    #[test]
    fn test_snapshot_aggregates() {
        let cart = CartSnapshot::new(vec![
            CartLine {
                product_id: "p1".to_string(),
                category_id: None,
                quantity: 2,
                unit_price: Money::from_rupees(100),
            },
            CartLine {
                product_id: "p2".to_string(),
                category_id: Some("c1".to_string()),
                quantity: 1,
                unit_price: Money::from_rupees(50),
            },
        ]);

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), Money::from_rupees(250));
    }

    #[test]
    fn test_tax_mode_default() {
        assert_eq!(TaxMode::default(), TaxMode::Exclusive);
    }
}
