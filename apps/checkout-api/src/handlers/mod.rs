//! # Request Handlers
//!
//! HTTP surface of the pricing engine.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Handler Pipeline                                 │
//! │                                                                         │
//! │  JSON request (camelCase)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Deserialize into DTOs ── malformed? ──► 400                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Resolve catalog data (categories, collections) from bazaar-db          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Call the pure evaluator in bazaar-core                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Serialize result (camelCase), rounded amounts only                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers hold no state between requests; every evaluation re-reads
//! settings and campaigns so admin changes apply immediately.

use axum::Router;
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use bazaar_core::types::{CartLine, CartSnapshot};
use bazaar_core::Money;

use crate::error::ApiError;
use crate::state::AppState;

pub mod campaign;
pub mod health;
pub mod tax;

/// Build a router with all routes registered (no middleware, no state).
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(tax::router())
        .merge(campaign::router())
        .merge(health::router())
}

/// Build the fully configured application.
pub fn build_app(state: AppState) -> Router {
    build_router()
        // Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Shared Cart DTO
// =============================================================================

/// A cart line as sent by the storefront.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    pub product_id: String,

    /// Optional: when absent, the category is resolved from the catalog.
    #[serde(default)]
    pub category_id: Option<String>,

    /// Listed unit price. Accepts JSON numbers and strings.
    pub price: Decimal,

    pub quantity: i64,
}

/// Converts request items into a cart snapshot, resolving categories from
/// the catalog for lines that arrived without one.
///
/// Unknown products keep `category_id: None` and fall back to the default
/// tax rate; the cart is priced as sent either way.
pub async fn resolve_cart(
    state: &AppState,
    items: Vec<CartItemDto>,
) -> Result<CartSnapshot, ApiError> {
    let unresolved: Vec<&str> = items
        .iter()
        .filter(|i| i.category_id.is_none())
        .map(|i| i.product_id.as_str())
        .collect();

    let catalog_categories = if unresolved.is_empty() {
        Default::default()
    } else {
        state.db.products().categories_for(&unresolved).await?
    };

    let lines = items
        .into_iter()
        .map(|item| CartLine {
            category_id: item
                .category_id
                .or_else(|| catalog_categories.get(&item.product_id).cloned()),
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: Money::new(item.price),
        })
        .collect();

    Ok(CartSnapshot::new(lines))
}
