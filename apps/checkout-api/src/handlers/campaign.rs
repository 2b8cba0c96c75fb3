//! # Cart Campaign Handler
//!
//! `POST /api/cart/campaigns` - evaluates promotional campaigns for a cart.
//!
//! ## Request
//! ```json
//! {
//!   "items": [
//!     { "productId": "p1", "price": 400, "quantity": 3 }
//!   ]
//! }
//! ```
//!
//! ## Response
//! ```json
//! {
//!   "success": true,
//!   "appliedCampaign": {
//!     "campaignId": "c1", "name": "Bulk Saver",
//!     "discountType": "flat", "discount": "100", "appliesTo": "cart"
//!   },
//!   "nearestCampaign": null,
//!   "subtotal": "1200"
//! }
//! ```
//!
//! `appliedCampaign: null` with a populated `nearestCampaign` drives the
//! storefront's "add N more to unlock" prompt.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use bazaar_core::campaign::{evaluate_campaigns, AppliedCampaign, NearestCampaign};
use bazaar_core::Money;

use crate::error::ApiError;
use crate::handlers::{resolve_cart, CartItemDto};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/cart/campaigns", post(cart_campaigns))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CampaignRequest {
    items: Vec<CartItemDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CampaignResponse {
    success: bool,
    applied_campaign: Option<AppliedCampaign>,
    nearest_campaign: Option<NearestCampaign>,
    subtotal: Money,
}

async fn cart_campaigns(
    State(state): State<AppState>,
    Json(req): Json<CampaignRequest>,
) -> Result<Json<CampaignResponse>, ApiError> {
    let cart = resolve_cart(&state, req.items).await?;

    let candidates = state.db.campaigns().candidates().await?;

    let product_ids: Vec<&str> = cart.lines.iter().map(|l| l.product_id.as_str()).collect();
    let collections = state.db.products().collections_for(&product_ids).await?;

    let outcome = evaluate_campaigns(&cart, &candidates, &collections, Utc::now())?;

    tracing::debug!(
        candidates = candidates.len(),
        applied = outcome.applied.as_ref().map(|a| a.campaign_id.as_str()),
        "Campaigns evaluated"
    );

    Ok(Json(CampaignResponse {
        success: true,
        applied_campaign: outcome.applied,
        nearest_campaign: outcome.nearest,
        subtotal: cart.subtotal().rounded(),
    }))
}
