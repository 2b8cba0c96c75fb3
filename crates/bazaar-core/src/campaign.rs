//! # Campaign Evaluator
//!
//! Evaluates promotional campaigns against a cart snapshot and selects the
//! single best discount to apply.
//!
//! ## Evaluation Flow
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │                      evaluate_campaigns()                              │
//! │                                                                        │
//! │  candidates ──► eligible? (status Active + now ∈ [start, end])         │
//! │                      │                                                 │
//! │                      ▼                                                 │
//! │  per campaign: check EVERY rule (AND, order-independent)               │
//! │     min_items / min_cart_value / category / collection                 │
//! │                      │                                                 │
//! │        ┌─────────────┴──────────────┐                                  │
//! │        ▼                            ▼                                  │
//! │  all satisfied               exactly one unmet,                        │
//! │        │                     quantitative shortfall                    │
//! │        ▼                            ▼                                  │
//! │  best match: priority desc,  nearest: same ordering,                   │
//! │  created_at asc              reports items/amount needed               │
//! │        │                                                               │
//! │        ▼                                                               │
//! │  discount from first action (flat | capped percentage)                 │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only one campaign applies per cart - no stacking. Malformed rule payloads
//! never match (fail-closed): a discount is never applied on ambiguous data.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::CartSnapshot;
use crate::validation::validate_cart;

// =============================================================================
// Campaign Domain Types
// =============================================================================

/// Stored campaign status. Purely an admin on/off switch.
///
/// Expiry is never written: a campaign whose window has passed is computed
/// as expired from `now`, see [`Campaign::effective_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Active,
    Inactive,
}

/// Status derived from the stored status plus the campaign window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EffectiveStatus {
    Draft,
    Inactive,
    /// Active, but the window hasn't opened yet.
    Scheduled,
    /// Active and inside the window - the only evaluable state.
    Live,
    /// Active, but the window has passed. Computed, never stored.
    Expired,
}

/// Parsed rule payload, keyed by rule type.
///
/// The source of truth stores `value` as a free-form JSON object; this
/// tagged union is validated at the deserialization boundary instead of
/// being poked at by untyped property lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "rule_type", content = "value", rename_all = "snake_case")]
pub enum RuleValue {
    /// Cart must contain at least `count` items (quantity-summed).
    MinItems { count: i64 },
    /// Cart subtotal must reach `amount`.
    MinCartValue { amount: Money },
    /// At least one line belongs to the category (existence test,
    /// not quantity-weighted).
    Category { category_id: String },
    /// At least one line's product is in the collection.
    Collection { collection_id: String },
}

/// A single AND-ed precondition on a campaign.
///
/// `value` is `None` when the stored payload did not validate against the
/// declared rule type. Such a rule never matches, which keeps the whole
/// campaign from applying (fail-closed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CampaignRule {
    /// Rule type as stored, kept for diagnostics.
    pub rule_type: String,
    /// Validated payload, or `None` for a malformed row.
    pub value: Option<RuleValue>,
}

impl CampaignRule {
    /// Parses a stored rule row into a validated rule.
    ///
    /// A payload that doesn't match the declared type (missing fields,
    /// wrong shapes, unknown rule type) yields `value: None`.
    pub fn parse(rule_type: &str, payload: &serde_json::Value) -> Self {
        let tagged = serde_json::json!({
            "rule_type": rule_type,
            "value": payload,
        });
        CampaignRule {
            rule_type: rule_type.to_string(),
            value: serde_json::from_value(tagged).ok(),
        }
    }
}

/// Discount shape of a campaign action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Flat,
    Percentage,
}

/// What a discount applies to. Cart-level only in the current scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AppliesTo {
    Cart,
}

/// The discount effect of a matched campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CampaignAction {
    pub discount_type: DiscountType,
    /// Flat: rupee amount. Percentage: percent of subtotal (20 = 20%).
    #[ts(as = "String")]
    pub discount_value: Decimal,
    /// Upper bound for percentage discounts.
    #[ts(as = "Option<String>")]
    pub max_discount: Option<Decimal>,
    pub applies_to: AppliesTo,
}

/// A time-boxed, rule-gated promotional discount definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub status: CampaignStatus,
    /// Higher wins when several campaigns match.
    pub priority: i64,
    #[ts(as = "String")]
    pub start_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub end_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// All rules are AND-ed.
    pub rules: Vec<CampaignRule>,
    /// The data model supports several; evaluation uses the first.
    pub actions: Vec<CampaignAction>,
}

impl Campaign {
    /// Derives the effective status at `now`.
    pub fn effective_status(&self, now: DateTime<Utc>) -> EffectiveStatus {
        match self.status {
            CampaignStatus::Draft => EffectiveStatus::Draft,
            CampaignStatus::Inactive => EffectiveStatus::Inactive,
            CampaignStatus::Active => {
                if now < self.start_at {
                    EffectiveStatus::Scheduled
                } else if now > self.end_at {
                    EffectiveStatus::Expired
                } else {
                    EffectiveStatus::Live
                }
            }
        }
    }

    /// A campaign is evaluable only while live.
    pub fn is_eligible(&self, now: DateTime<Utc>) -> bool {
        self.effective_status(now) == EffectiveStatus::Live
    }
}

// =============================================================================
// Collection Membership
// =============================================================================

/// Pre-fetched product → collection memberships.
///
/// `collection` rules need a product→collection lookup the evaluator does
/// not own. The caller resolves memberships up front (one fetch per
/// evaluation) and passes them in; products missing from the map simply
/// don't match, so a failed lookup degrades to "rule not satisfied".
#[derive(Debug, Clone, Default)]
pub struct ProductCollections {
    memberships: HashMap<String, HashSet<String>>,
}

impl ProductCollections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, product_id: impl Into<String>, collection_id: impl Into<String>) {
        self.memberships
            .entry(product_id.into())
            .or_default()
            .insert(collection_id.into());
    }

    pub fn contains(&self, product_id: &str, collection_id: &str) -> bool {
        self.memberships
            .get(product_id)
            .is_some_and(|set| set.contains(collection_id))
    }
}

impl From<HashMap<String, HashSet<String>>> for ProductCollections {
    fn from(memberships: HashMap<String, HashSet<String>>) -> Self {
        ProductCollections { memberships }
    }
}

// =============================================================================
// Evaluation Output
// =============================================================================

/// The discount chosen for a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AppliedCampaign {
    pub campaign_id: String,
    pub name: String,
    pub discount_type: DiscountType,
    /// Absolute discount amount, rounded.
    pub discount: Money,
    pub applies_to: AppliesTo,
}

/// Advisory "add N more to unlock" hint. Not itself a discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NearestCampaign {
    pub campaign_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_needed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_needed: Option<Money>,
}

/// Result of evaluating all candidate campaigns against one cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CampaignOutcome {
    pub applied: Option<AppliedCampaign>,
    pub nearest: Option<NearestCampaign>,
}

impl CampaignOutcome {
    fn none() -> Self {
        CampaignOutcome {
            applied: None,
            nearest: None,
        }
    }
}

// =============================================================================
// Rule Matching
// =============================================================================

/// Outcome of checking one rule against the cart.
#[derive(Debug, Clone, PartialEq)]
enum RuleCheck {
    Satisfied,
    /// Unmet, but quantifiable: this many more items would satisfy it.
    ShortItems(i64),
    /// Unmet, but quantifiable: this much more cart value would satisfy it.
    ShortAmount(Money),
    /// Unmet with no meaningful shortfall (category/collection/malformed).
    Unsatisfied,
}

/// Checks a single rule. Side-effect-free and order-independent.
fn check_rule(
    rule: &CampaignRule,
    cart: &CartSnapshot,
    collections: &ProductCollections,
) -> RuleCheck {
    let Some(value) = &rule.value else {
        // Malformed payload: fail closed.
        return RuleCheck::Unsatisfied;
    };

    match value {
        RuleValue::MinItems { count } => {
            let have = cart.item_count();
            if have >= *count {
                RuleCheck::Satisfied
            } else {
                RuleCheck::ShortItems(count - have)
            }
        }
        RuleValue::MinCartValue { amount } => {
            let have = cart.subtotal();
            if have >= *amount {
                RuleCheck::Satisfied
            } else {
                RuleCheck::ShortAmount(*amount - have)
            }
        }
        RuleValue::Category { category_id } => {
            let hit = cart
                .lines
                .iter()
                .any(|l| l.category_id.as_deref() == Some(category_id.as_str()));
            if hit {
                RuleCheck::Satisfied
            } else {
                RuleCheck::Unsatisfied
            }
        }
        RuleValue::Collection { collection_id } => {
            let hit = cart
                .lines
                .iter()
                .any(|l| collections.contains(&l.product_id, collection_id));
            if hit {
                RuleCheck::Satisfied
            } else {
                RuleCheck::Unsatisfied
            }
        }
    }
}

// =============================================================================
// Discount Computation
// =============================================================================

/// Computes the absolute discount for a matched campaign's action.
///
/// Flat discounts never exceed the subtotal (net total never goes below
/// zero); percentage discounts honor `max_discount` when set. Negative
/// stored values are clamped to zero rather than inflating the total.
fn compute_discount(action: &CampaignAction, subtotal: Money) -> Money {
    let value = action.discount_value.max(Decimal::ZERO);

    let raw = match action.discount_type {
        DiscountType::Flat => Money::new(value).min(subtotal),
        DiscountType::Percentage => {
            let pct = subtotal.mul_fraction(value / Decimal::ONE_HUNDRED);
            match action.max_discount {
                Some(cap) => pct.min(Money::new(cap.max(Decimal::ZERO))),
                None => pct,
            }
        }
    };

    raw.rounded()
}

// =============================================================================
// Evaluator
// =============================================================================

/// Evaluates candidate campaigns against a cart snapshot.
///
/// Pure function: identical inputs always produce an identical outcome, so
/// concurrent evaluations for different carts need no coordination.
///
/// ## Selection
/// Among fully-matching campaigns: highest `priority`, ties broken by
/// earliest `created_at` (first-created wins). Only the winner's discount
/// applies - no stacking.
///
/// ## Nearest
/// When nothing matches, the single almost-matching campaign (exactly one
/// unmet rule with a quantifiable shortfall) is reported so the storefront
/// can render "add N more to unlock" prompts. Near misses are ordered the
/// same way as matches.
///
/// ## Errors
/// Only for invalid cart input. No matching campaign is a legitimate
/// `{applied: None, nearest: ...}` outcome, not an error.
pub fn evaluate_campaigns(
    cart: &CartSnapshot,
    candidates: &[Campaign],
    collections: &ProductCollections,
    now: DateTime<Utc>,
) -> CoreResult<CampaignOutcome> {
    validate_cart(cart)?;

    let mut matching: Vec<&Campaign> = Vec::new();
    let mut near_misses: Vec<(&Campaign, RuleCheck)> = Vec::new();

    for campaign in candidates.iter().filter(|c| c.is_eligible(now)) {
        let checks: Vec<RuleCheck> = campaign
            .rules
            .iter()
            .map(|rule| check_rule(rule, cart, collections))
            .collect();

        if checks.iter().all(|c| *c == RuleCheck::Satisfied) {
            matching.push(campaign);
            continue;
        }

        // Almost-matching: exactly one unmet rule, and it has a shortfall.
        let mut unmet = checks.into_iter().filter(|c| *c != RuleCheck::Satisfied);
        if let (Some(only), None) = (unmet.next(), unmet.next()) {
            match only {
                RuleCheck::ShortItems(_) | RuleCheck::ShortAmount(_) => {
                    near_misses.push((campaign, only));
                }
                _ => {}
            }
        }
    }

    let by_best = |a: &Campaign, b: &Campaign| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.created_at.cmp(&b.created_at))
    };

    matching.sort_by(|a, b| by_best(a, b));

    // A matched campaign without an action cannot produce a discount;
    // fall through to the next best match.
    if let Some((winner, action)) = matching
        .iter()
        .find_map(|c| c.actions.first().map(|a| (*c, a)))
    {
        let discount = compute_discount(action, cart.subtotal());
        return Ok(CampaignOutcome {
            applied: Some(AppliedCampaign {
                campaign_id: winner.id.clone(),
                name: winner.name.clone(),
                discount_type: action.discount_type,
                discount,
                applies_to: action.applies_to,
            }),
            nearest: None,
        });
    }

    near_misses.sort_by(|a, b| by_best(a.0, b.0));

    if let Some((campaign, shortfall)) = near_misses.into_iter().next() {
        let (items_needed, amount_needed) = match shortfall {
            RuleCheck::ShortItems(n) => (Some(n), None),
            RuleCheck::ShortAmount(m) => (None, Some(m.rounded())),
            _ => (None, None),
        };
        return Ok(CampaignOutcome {
            applied: None,
            nearest: Some(NearestCampaign {
                campaign_id: campaign.id.clone(),
                name: campaign.name.clone(),
                items_needed,
                amount_needed,
            }),
        });
    }

    Ok(CampaignOutcome::none())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::CartLine;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn cart(lines: Vec<(i64, i64)>) -> CartSnapshot {
        CartSnapshot::new(
            lines
                .into_iter()
                .enumerate()
                .map(|(i, (price, qty))| CartLine {
                    product_id: format!("p{i}"),
                    category_id: None,
                    quantity: qty,
                    unit_price: Money::from_rupees(price),
                })
                .collect(),
        )
    }

    fn campaign(id: &str, priority: i64, rules: Vec<RuleValue>) -> Campaign {
        Campaign {
            id: id.to_string(),
            name: format!("Campaign {id}"),
            status: CampaignStatus::Active,
            priority,
            start_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
            end_at: Utc.with_ymd_and_hms(2025, 6, 30, 0, 0, 0).unwrap(),
            created_at: Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap(),
            rules: rules
                .into_iter()
                .map(|v| CampaignRule {
                    rule_type: match &v {
                        RuleValue::MinItems { .. } => "min_items".to_string(),
                        RuleValue::MinCartValue { .. } => "min_cart_value".to_string(),
                        RuleValue::Category { .. } => "category".to_string(),
                        RuleValue::Collection { .. } => "collection".to_string(),
                    },
                    value: Some(v),
                })
                .collect(),
            actions: vec![CampaignAction {
                discount_type: DiscountType::Flat,
                discount_value: Decimal::from(50),
                max_discount: None,
                applies_to: AppliesTo::Cart,
            }],
        }
    }

    fn min_items(count: i64) -> RuleValue {
        RuleValue::MinItems { count }
    }

    fn min_cart_value(amount: i64) -> RuleValue {
        RuleValue::MinCartValue {
            amount: Money::from_rupees(amount),
        }
    }

    #[test]
    fn test_priority_wins_over_order() {
        // 3-item cart: min_items:3 at priority 5 vs min_cart_value:500
        // (also met) at priority 10 → the priority-10 campaign applies
        let cart = cart(vec![(400, 3)]);
        let candidates = vec![
            campaign("low", 5, vec![min_items(3)]),
            campaign("high", 10, vec![min_cart_value(500)]),
        ];

        let outcome =
            evaluate_campaigns(&cart, &candidates, &ProductCollections::new(), now()).unwrap();
        let applied = outcome.applied.unwrap();
        assert_eq!(applied.campaign_id, "high");
        assert!(outcome.nearest.is_none());
    }

    #[test]
    fn test_percentage_discount_capped() {
        // 20% of ₹1000 = 200, capped at 100
        let cart = cart(vec![(1000, 1)]);
        let mut c = campaign("pct", 1, vec![min_cart_value(500)]);
        c.actions = vec![CampaignAction {
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::from(20),
            max_discount: Some(Decimal::from(100)),
            applies_to: AppliesTo::Cart,
        }];

        let outcome =
            evaluate_campaigns(&cart, &[c], &ProductCollections::new(), now()).unwrap();
        let applied = outcome.applied.unwrap();
        assert_eq!(applied.discount, Money::from_rupees(100));
    }

    #[test]
    fn test_percentage_discount_uncapped() {
        let cart = cart(vec![(1000, 1)]);
        let mut c = campaign("pct", 1, vec![min_cart_value(500)]);
        c.actions = vec![CampaignAction {
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::from(20),
            max_discount: None,
            applies_to: AppliesTo::Cart,
        }];

        let outcome =
            evaluate_campaigns(&cart, &[c], &ProductCollections::new(), now()).unwrap();
        assert_eq!(outcome.applied.unwrap().discount, Money::from_rupees(200));
    }

    #[test]
    fn test_flat_discount_never_exceeds_subtotal() {
        let cart = cart(vec![(30, 1)]);
        let c = campaign("flat50", 1, vec![]);

        let outcome =
            evaluate_campaigns(&cart, &[c], &ProductCollections::new(), now()).unwrap();
        assert_eq!(outcome.applied.unwrap().discount, Money::from_rupees(30));
    }

    #[test]
    fn test_nearest_reports_items_shortfall() {
        // 2 items against min_items:5 → applied=None, itemsNeeded=3
        let cart = cart(vec![(100, 2)]);
        let candidates = vec![campaign("needs5", 1, vec![min_items(5)])];

        let outcome =
            evaluate_campaigns(&cart, &candidates, &ProductCollections::new(), now()).unwrap();
        assert!(outcome.applied.is_none());
        let nearest = outcome.nearest.unwrap();
        assert_eq!(nearest.campaign_id, "needs5");
        assert_eq!(nearest.items_needed, Some(3));
        assert_eq!(nearest.amount_needed, None);
    }

    #[test]
    fn test_nearest_reports_amount_shortfall() {
        let cart = cart(vec![(300, 1)]);
        let candidates = vec![campaign("needs500", 1, vec![min_cart_value(500)])];

        let outcome =
            evaluate_campaigns(&cart, &candidates, &ProductCollections::new(), now()).unwrap();
        let nearest = outcome.nearest.unwrap();
        assert_eq!(nearest.amount_needed, Some(Money::from_rupees(200)));
        assert_eq!(nearest.items_needed, None);
    }

    #[test]
    fn test_nearest_prefers_higher_priority_near_miss() {
        // Both campaigns miss on min_items; the higher-priority one is
        // the advertised near miss even though it needs more items
        let cart = cart(vec![(100, 2)]);
        let candidates = vec![
            campaign("low", 3, vec![min_items(4)]),
            campaign("high", 9, vec![min_items(6)]),
        ];

        let outcome =
            evaluate_campaigns(&cart, &candidates, &ProductCollections::new(), now()).unwrap();
        assert!(outcome.applied.is_none());
        let nearest = outcome.nearest.unwrap();
        assert_eq!(nearest.campaign_id, "high");
        assert_eq!(nearest.items_needed, Some(4));
    }

    #[test]
    fn test_nearest_tie_break_earliest_created_wins() {
        let cart = cart(vec![(100, 1)]);
        let mut older = campaign("older", 5, vec![min_cart_value(500)]);
        older.created_at = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        let mut newer = campaign("newer", 5, vec![min_cart_value(300)]);
        newer.created_at = Utc.with_ymd_and_hms(2025, 4, 20, 0, 0, 0).unwrap();

        // newer listed first so input order cannot mask the tie-break
        let outcome =
            evaluate_campaigns(&cart, &[newer, older], &ProductCollections::new(), now())
                .unwrap();
        let nearest = outcome.nearest.unwrap();
        assert_eq!(nearest.campaign_id, "older");
        assert_eq!(nearest.amount_needed, Some(Money::from_rupees(400)));
    }

    #[test]
    fn test_two_unmet_rules_is_not_nearest() {
        let cart = cart(vec![(100, 1)]);
        let candidates = vec![campaign(
            "far",
            1,
            vec![min_items(5), min_cart_value(1000)],
        )];

        let outcome =
            evaluate_campaigns(&cart, &candidates, &ProductCollections::new(), now()).unwrap();
        assert!(outcome.applied.is_none());
        assert!(outcome.nearest.is_none());
    }

    #[test]
    fn test_tie_break_earliest_created_wins() {
        let cart = cart(vec![(1000, 3)]);
        let mut first = campaign("first", 5, vec![min_items(1)]);
        first.created_at = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        let mut second = campaign("second", 5, vec![min_items(1)]);
        second.created_at = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();

        // Order in the candidate list must not matter
        let outcome = evaluate_campaigns(
            &cart,
            &[second.clone(), first.clone()],
            &ProductCollections::new(),
            now(),
        )
        .unwrap();
        assert_eq!(outcome.applied.unwrap().campaign_id, "first");
    }

    #[test]
    fn test_expired_window_is_ineligible_without_status_change() {
        let cart = cart(vec![(1000, 3)]);
        let mut c = campaign("old", 5, vec![min_items(1)]);
        c.end_at = Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap();

        assert_eq!(c.status, CampaignStatus::Active);
        assert_eq!(c.effective_status(now()), EffectiveStatus::Expired);

        let outcome =
            evaluate_campaigns(&cart, &[c], &ProductCollections::new(), now()).unwrap();
        assert!(outcome.applied.is_none());
        assert!(outcome.nearest.is_none());
    }

    #[test]
    fn test_draft_and_inactive_are_ineligible() {
        let cart = cart(vec![(1000, 3)]);
        let mut draft = campaign("draft", 5, vec![]);
        draft.status = CampaignStatus::Draft;
        let mut off = campaign("off", 5, vec![]);
        off.status = CampaignStatus::Inactive;

        let outcome =
            evaluate_campaigns(&cart, &[draft, off], &ProductCollections::new(), now()).unwrap();
        assert!(outcome.applied.is_none());
    }

    #[test]
    fn test_scheduled_campaign_not_yet_live() {
        let mut c = campaign("future", 5, vec![]);
        c.start_at = Utc.with_ymd_and_hms(2025, 6, 20, 0, 0, 0).unwrap();
        assert_eq!(c.effective_status(now()), EffectiveStatus::Scheduled);
        assert!(!c.is_eligible(now()));
    }

    #[test]
    fn test_category_rule_membership() {
        let mut snapshot = cart(vec![(100, 1)]);
        snapshot.lines[0].category_id = Some("shoes".to_string());

        let matched = campaign(
            "shoes",
            1,
            vec![RuleValue::Category {
                category_id: "shoes".to_string(),
            }],
        );
        let unmatched = campaign(
            "bags",
            2,
            vec![RuleValue::Category {
                category_id: "bags".to_string(),
            }],
        );

        let outcome = evaluate_campaigns(
            &snapshot,
            &[matched, unmatched],
            &ProductCollections::new(),
            now(),
        )
        .unwrap();
        assert_eq!(outcome.applied.unwrap().campaign_id, "shoes");
    }

    #[test]
    fn test_collection_rule_uses_membership_map() {
        let snapshot = cart(vec![(100, 1)]);
        let c = campaign(
            "summer",
            1,
            vec![RuleValue::Collection {
                collection_id: "summer-sale".to_string(),
            }],
        );

        // Product not in the map: rule doesn't match
        let outcome = evaluate_campaigns(
            &snapshot,
            std::slice::from_ref(&c),
            &ProductCollections::new(),
            now(),
        )
        .unwrap();
        assert!(outcome.applied.is_none());

        let mut collections = ProductCollections::new();
        collections.insert("p0", "summer-sale");
        let outcome = evaluate_campaigns(&snapshot, &[c], &collections, now()).unwrap();
        assert!(outcome.applied.is_some());
    }

    #[test]
    fn test_malformed_rule_fails_closed() {
        // Payload is missing the `count` field
        let rule = CampaignRule::parse("min_items", &serde_json::json!({"items": 3}));
        assert!(rule.value.is_none());

        let mut c = campaign("broken", 10, vec![]);
        c.rules = vec![rule];

        let snapshot = cart(vec![(1000, 5)]);
        let outcome =
            evaluate_campaigns(&snapshot, &[c], &ProductCollections::new(), now()).unwrap();
        // Never applied on ambiguous data, and not a near miss either
        assert!(outcome.applied.is_none());
        assert!(outcome.nearest.is_none());
    }

    #[test]
    fn test_rule_parse_valid_payloads() {
        let rule = CampaignRule::parse("min_items", &serde_json::json!({"count": 3}));
        assert_eq!(rule.value, Some(RuleValue::MinItems { count: 3 }));

        let rule = CampaignRule::parse("min_cart_value", &serde_json::json!({"amount": 500}));
        assert_eq!(
            rule.value,
            Some(RuleValue::MinCartValue {
                amount: Money::from_rupees(500)
            })
        );

        let rule = CampaignRule::parse("category", &serde_json::json!({"category_id": "c9"}));
        assert_eq!(
            rule.value,
            Some(RuleValue::Category {
                category_id: "c9".to_string()
            })
        );

        let rule = CampaignRule::parse("no_such_rule", &serde_json::json!({}));
        assert!(rule.value.is_none());
    }

    #[test]
    fn test_campaign_without_action_is_skipped() {
        let snapshot = cart(vec![(1000, 3)]);
        let mut no_action = campaign("empty", 10, vec![min_items(1)]);
        no_action.actions.clear();
        let fallback = campaign("fallback", 5, vec![min_items(1)]);

        let outcome = evaluate_campaigns(
            &snapshot,
            &[no_action, fallback],
            &ProductCollections::new(),
            now(),
        )
        .unwrap();
        assert_eq!(outcome.applied.unwrap().campaign_id, "fallback");
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let snapshot = cart(vec![(400, 3)]);
        let candidates = vec![
            campaign("a", 5, vec![min_items(3)]),
            campaign("b", 10, vec![min_cart_value(500)]),
            campaign("c", 1, vec![min_items(10)]),
        ];
        let collections = ProductCollections::new();

        let first = evaluate_campaigns(&snapshot, &candidates, &collections, now()).unwrap();
        let second = evaluate_campaigns(&snapshot, &candidates, &collections, now()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_candidates_yield_nothing() {
        let snapshot = cart(vec![(400, 3)]);
        let outcome =
            evaluate_campaigns(&snapshot, &[], &ProductCollections::new(), now()).unwrap();
        assert_eq!(outcome, CampaignOutcome::none());
    }

    #[test]
    fn test_invalid_cart_rejected() {
        let mut snapshot = cart(vec![(400, 3)]);
        snapshot.lines[0].quantity = -1;
        let result = evaluate_campaigns(&snapshot, &[], &ProductCollections::new(), now());
        assert!(result.is_err());
    }
}
