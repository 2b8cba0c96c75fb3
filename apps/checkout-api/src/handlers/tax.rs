//! # Cart Tax Handler
//!
//! `POST /api/cart/tax` - computes the GST breakdown for a cart.
//!
//! ## Request
//! ```json
//! {
//!   "items": [
//!     { "productId": "p1", "price": 1000, "quantity": 1 }
//!   ],
//!   "customerState": "Karnataka"
//! }
//! ```
//!
//! ## Response
//! ```json
//! {
//!   "success": true,
//!   "taxBreakdown": {
//!     "taxType": "inter-state",
//!     "taxableAmount": "847.46",
//!     "cgst": "0", "sgst": "0", "igst": "152.54",
//!     "totalTax": "152.54"
//!   },
//!   "taxSettings": { "taxEnabled": true, "taxMode": "inclusive", ... }
//! }
//! ```

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use bazaar_core::tax::{calculate_tax, TaxBreakdown};
use bazaar_core::types::{TaxMode, TaxSettings};

use crate::error::ApiError;
use crate::handlers::{resolve_cart, CartItemDto};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/cart/tax", post(cart_tax))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaxRequest {
    items: Vec<CartItemDto>,

    /// Delivery state. Absent or blank means the destination is unknown
    /// and tax is treated as inter-state.
    #[serde(default)]
    customer_state: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaxResponse {
    success: bool,
    tax_breakdown: TaxBreakdown,
    tax_settings: TaxSettingsDto,
}

/// Settings echo so the storefront can label the breakdown correctly
/// (e.g. "prices include GST").
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaxSettingsDto {
    tax_enabled: bool,
    tax_mode: TaxMode,
    default_rate_bps: u32,
    store_state: String,
    gstin: String,
}

impl From<TaxSettings> for TaxSettingsDto {
    fn from(s: TaxSettings) -> Self {
        TaxSettingsDto {
            tax_enabled: s.tax_enabled,
            tax_mode: s.tax_mode,
            default_rate_bps: s.default_rate.bps(),
            store_state: s.store_state,
            gstin: s.gstin,
        }
    }
}

async fn cart_tax(
    State(state): State<AppState>,
    Json(req): Json<TaxRequest>,
) -> Result<Json<TaxResponse>, ApiError> {
    let cart = resolve_cart(&state, req.items).await?;

    let settings = state.db.settings().tax_settings().await?;
    let overrides = state.db.tax_rules().rate_overrides().await?;

    let customer_state = req.customer_state.unwrap_or_default();
    let breakdown = calculate_tax(&cart, &customer_state, &settings, &overrides)?;

    tracing::debug!(
        lines = cart.lines.len(),
        tax_type = ?breakdown.tax_type,
        "Tax breakdown computed"
    );

    Ok(Json(TaxResponse {
        success: true,
        tax_breakdown: breakdown,
        tax_settings: settings.into(),
    }))
}
