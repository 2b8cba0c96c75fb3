//! # GST Tax Calculator
//!
//! Computes the per-cart GST breakdown: CGST + SGST for intra-state
//! deliveries, IGST for inter-state.
//!
//! ## Computation Flow
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │                      calculate_tax()                                   │
//! │                                                                        │
//! │  CartSnapshot ──► validate ──► tax disabled? ──► zero breakdown        │
//! │                                    │no                                 │
//! │                                    ▼                                   │
//! │             customer_state == store_state ? intra : inter              │
//! │                                    │                                   │
//! │                                    ▼                                   │
//! │  per line: rate = category override | default                         │
//! │            inclusive: base = amount / (1 + r); tax = amount - base    │
//! │            exclusive: base = amount;           tax = amount × r       │
//! │                                    │                                   │
//! │                                    ▼                                   │
//! │  Σ unrounded ──► round(2dp) ──► split (CGST/SGST or IGST)             │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Accumulation is unrounded; every field of the returned breakdown is
//! rounded to 2 decimal places exactly once, at the end.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{CartSnapshot, GstRate, TaxMode, TaxSettings};
use crate::validation::validate_cart;

// =============================================================================
// Output Types
// =============================================================================

/// Whether the delivery is taxed as intra-state or inter-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TaxType {
    /// Delivery state matches the store's registered state: CGST + SGST.
    #[serde(rename = "intra-state")]
    IntraState,
    /// Everything else (including unknown/blank state): IGST.
    #[serde(rename = "inter-state")]
    InterState,
}

/// Aggregate tax breakdown for a cart.
///
/// ## Invariants
/// - IntraState: `igst == 0` and `cgst == sgst == round(total_tax / 2)`.
///   When the unrounded half-tax lands on a half paisa, the two rounded
///   halves can sum to one paisa off `total_tax`; consumers must not
///   assume `cgst + sgst == total_tax` exactly at 2 dp.
/// - InterState: `cgst == sgst == 0` and `igst == total_tax`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    pub tax_type: TaxType,
    /// Pre-tax value of the cart.
    pub taxable_amount: Money,
    pub cgst: Money,
    pub sgst: Money,
    pub igst: Money,
    pub total_tax: Money,
}

impl TaxBreakdown {
    /// All-zero breakdown, used when tax collection is disabled.
    pub fn zero(tax_type: TaxType) -> Self {
        TaxBreakdown {
            tax_type,
            taxable_amount: Money::zero(),
            cgst: Money::zero(),
            sgst: Money::zero(),
            igst: Money::zero(),
            total_tax: Money::zero(),
        }
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Determines the tax type for a delivery.
///
/// Intra-state requires an explicit, case-sensitive match against the
/// store's registered state. A blank or unknown customer state is
/// conservatively treated as inter-state: we never assume intra-state
/// without an exact match.
pub fn determine_tax_type(customer_state: &str, settings: &TaxSettings) -> TaxType {
    let customer = customer_state.trim();
    if !customer.is_empty() && customer == settings.store_state {
        TaxType::IntraState
    } else {
        TaxType::InterState
    }
}

/// Computes the GST breakdown for a cart.
///
/// Pure function: same inputs, same breakdown. Settings and category
/// overrides are passed in explicitly; the calculator performs no I/O.
///
/// ## Arguments
/// * `cart` - cart snapshot with frozen prices
/// * `customer_state` - delivery state as entered/selected by the customer
/// * `settings` - store tax configuration (explicit, not fetched here)
/// * `category_overrides` - category_id → GST rate, overrides the default
///
/// ## Errors
/// Only for invalid input (negative price, non-positive quantity). Tax
/// being disabled or the cart being empty are not errors.
pub fn calculate_tax(
    cart: &CartSnapshot,
    customer_state: &str,
    settings: &TaxSettings,
    category_overrides: &HashMap<String, GstRate>,
) -> CoreResult<TaxBreakdown> {
    validate_cart(cart)?;

    let tax_type = determine_tax_type(customer_state, settings);

    if !settings.tax_enabled {
        return Ok(TaxBreakdown::zero(tax_type));
    }

    // Unrounded accumulators. Rounding happens once, on the way out.
    let mut taxable = Decimal::ZERO;
    let mut total_tax = Decimal::ZERO;

    for line in &cart.lines {
        let rate = line
            .category_id
            .as_ref()
            .and_then(|cat| category_overrides.get(cat))
            .copied()
            .unwrap_or(settings.default_rate);

        let amount = line.line_total().amount();
        let fraction = rate.fraction();

        let (base, tax) = match settings.tax_mode {
            // Listed amount already contains tax. rate >= 0 means the
            // denominator is >= 1, so division cannot fail.
            TaxMode::Inclusive => {
                let base = amount / (Decimal::ONE + fraction);
                (base, amount - base)
            }
            TaxMode::Exclusive => (amount, amount * fraction),
        };

        taxable += base;
        total_tax += tax;
    }

    let (cgst, sgst, igst) = match tax_type {
        TaxType::IntraState => {
            let half = Money::new(total_tax / Decimal::TWO).rounded();
            (half, half, Money::zero())
        }
        TaxType::InterState => (
            Money::zero(),
            Money::zero(),
            Money::new(total_tax).rounded(),
        ),
    };

    Ok(TaxBreakdown {
        tax_type,
        taxable_amount: Money::new(taxable).rounded(),
        cgst,
        sgst,
        igst,
        total_tax: Money::new(total_tax).rounded(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
