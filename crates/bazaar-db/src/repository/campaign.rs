//! # Campaign Repository
//!
//! Database operations for campaigns and their rules and actions.
//!
//! ## Loading Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  How Campaigns Are Assembled                            │
//! │                                                                         │
//! │  1. SELECT matching campaign rows                                      │
//! │  2. SELECT all rules for those campaigns (one IN query)                │
//! │  3. SELECT all actions for those campaigns (one IN query)              │
//! │  4. Group by campaign_id, parse rule payloads                          │
//! │                                                                         │
//! │  Rule payloads are free-form JSON in the database. Parsing happens     │
//! │  HERE, once, on load: a payload that doesn't validate against its      │
//! │  declared rule type becomes a never-matching rule. The evaluator       │
//! │  never sees raw JSON.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bazaar_core::campaign::{
    AppliesTo, Campaign, CampaignAction, CampaignRule, CampaignStatus, DiscountType,
};

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CampaignRow {
    id: String,
    name: String,
    status: String,
    priority: i64,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct RuleRow {
    campaign_id: String,
    rule_type: String,
    value: String,
}

#[derive(Debug, sqlx::FromRow)]
struct ActionRow {
    campaign_id: String,
    discount_type: String,
    discount_value: String,
    max_discount: Option<String>,
    applies_to: String,
}

fn status_str(status: CampaignStatus) -> &'static str {
    match status {
        CampaignStatus::Draft => "draft",
        CampaignStatus::Active => "active",
        CampaignStatus::Inactive => "inactive",
    }
}

fn parse_status(s: &str) -> DbResult<CampaignStatus> {
    match s {
        "draft" => Ok(CampaignStatus::Draft),
        "active" => Ok(CampaignStatus::Active),
        "inactive" => Ok(CampaignStatus::Inactive),
        other => Err(DbError::invalid_data(format!(
            "unknown campaign status: {other}"
        ))),
    }
}

impl RuleRow {
    /// Parses the stored payload. Unparseable JSON degrades to a
    /// never-matching rule rather than failing the load.
    fn into_rule(self) -> CampaignRule {
        let payload =
            serde_json::from_str(&self.value).unwrap_or(serde_json::Value::Null);
        let rule = CampaignRule::parse(&self.rule_type, &payload);
        if rule.value.is_none() {
            warn!(
                campaign_id = %self.campaign_id,
                rule_type = %self.rule_type,
                "Malformed campaign rule payload, rule will never match"
            );
        }
        rule
    }
}

impl ActionRow {
    fn into_action(self) -> DbResult<CampaignAction> {
        let discount_type = match self.discount_type.as_str() {
            "flat" => DiscountType::Flat,
            "percentage" => DiscountType::Percentage,
            other => {
                return Err(DbError::invalid_data(format!(
                    "unknown discount type: {other}"
                )));
            }
        };

        let discount_value = Decimal::from_str(&self.discount_value)
            .map_err(|_| DbError::invalid_data("unparseable discount value"))?;

        let max_discount = self
            .max_discount
            .as_deref()
            .map(Decimal::from_str)
            .transpose()
            .map_err(|_| DbError::invalid_data("unparseable max discount"))?;

        let applies_to = match self.applies_to.as_str() {
            "cart" => AppliesTo::Cart,
            other => {
                return Err(DbError::invalid_data(format!(
                    "unknown applies_to: {other}"
                )));
            }
        };

        Ok(CampaignAction {
            discount_type,
            discount_value,
            max_discount,
            applies_to,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for campaign database operations.
#[derive(Debug, Clone)]
pub struct CampaignRepository {
    pool: SqlitePool,
}

impl CampaignRepository {
    /// Creates a new CampaignRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CampaignRepository { pool }
    }

    /// Loads the evaluation candidates: campaigns with stored status
    /// `active`. Window eligibility is decided by the evaluator, not here,
    /// so "expired" never has to be written back.
    pub async fn candidates(&self) -> DbResult<Vec<Campaign>> {
        let rows: Vec<CampaignRow> = sqlx::query_as(
            r#"
            SELECT id, name, status, priority, start_at, end_at, created_at
            FROM campaigns
            WHERE status = 'active'
            ORDER BY priority DESC, created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        self.assemble(rows).await
    }

    /// Lists all campaigns regardless of status (admin views).
    pub async fn list_all(&self) -> DbResult<Vec<Campaign>> {
        let rows: Vec<CampaignRow> = sqlx::query_as(
            r#"
            SELECT id, name, status, priority, start_at, end_at, created_at
            FROM campaigns
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        self.assemble(rows).await
    }

    /// Gets a single campaign by ID.
    pub async fn get(&self, id: &str) -> DbResult<Option<Campaign>> {
        let row: Option<CampaignRow> = sqlx::query_as(
            r#"
            SELECT id, name, status, priority, start_at, end_at, created_at
            FROM campaigns
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.assemble(vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    /// Inserts a campaign with its rules and actions in one transaction.
    pub async fn insert(&self, campaign: &Campaign) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO campaigns (id, name, status, priority, start_at, end_at, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&campaign.id)
        .bind(&campaign.name)
        .bind(status_str(campaign.status))
        .bind(campaign.priority)
        .bind(campaign.start_at)
        .bind(campaign.end_at)
        .bind(campaign.created_at)
        .execute(&mut *tx)
        .await?;

        for rule in &campaign.rules {
            sqlx::query(
                r#"
                INSERT INTO campaign_rules (id, campaign_id, rule_type, value)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&campaign.id)
            .bind(&rule.rule_type)
            .bind(rule_payload_json(rule))
            .execute(&mut *tx)
            .await?;
        }

        for (i, action) in campaign.actions.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO campaign_actions
                    (id, campaign_id, discount_type, discount_value, max_discount, applies_to, sort_order)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&campaign.id)
            .bind(match action.discount_type {
                DiscountType::Flat => "flat",
                DiscountType::Percentage => "percentage",
            })
            .bind(action.discount_value.to_string())
            .bind(action.max_discount.map(|d| d.to_string()))
            .bind("cart")
            .bind(i as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(id = %campaign.id, name = %campaign.name, "Campaign inserted");
        Ok(())
    }

    /// Changes a campaign's stored status.
    pub async fn set_status(&self, id: &str, status: CampaignStatus) -> DbResult<()> {
        let result = sqlx::query("UPDATE campaigns SET status = ?1 WHERE id = ?2")
            .bind(status_str(status))
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Campaign", id));
        }
        Ok(())
    }

    /// Deletes a campaign. Rules and actions cascade.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM campaigns WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Attaches rules and actions to the given campaign rows.
    async fn assemble(&self, rows: Vec<CampaignRow>) -> DbResult<Vec<Campaign>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();

        let mut rules_by_campaign: HashMap<String, Vec<CampaignRule>> = HashMap::new();
        for row in self.fetch_rules(&ids).await? {
            let campaign_id = row.campaign_id.clone();
            rules_by_campaign
                .entry(campaign_id)
                .or_default()
                .push(row.into_rule());
        }

        let mut actions_by_campaign: HashMap<String, Vec<CampaignAction>> = HashMap::new();
        for row in self.fetch_actions(&ids).await? {
            let campaign_id = row.campaign_id.clone();
            actions_by_campaign
                .entry(campaign_id)
                .or_default()
                .push(row.into_action()?);
        }

        rows.into_iter()
            .map(|row| {
                Ok(Campaign {
                    rules: rules_by_campaign.remove(&row.id).unwrap_or_default(),
                    actions: actions_by_campaign.remove(&row.id).unwrap_or_default(),
                    status: parse_status(&row.status)?,
                    id: row.id,
                    name: row.name,
                    priority: row.priority,
                    start_at: row.start_at,
                    end_at: row.end_at,
                    created_at: row.created_at,
                })
            })
            .collect()
    }

    async fn fetch_rules(&self, campaign_ids: &[&str]) -> DbResult<Vec<RuleRow>> {
        let mut qb = sqlx::QueryBuilder::new(
            "SELECT campaign_id, rule_type, value FROM campaign_rules WHERE campaign_id IN (",
        );
        let mut sep = qb.separated(", ");
        for id in campaign_ids {
            sep.push_bind(*id);
        }
        sep.push_unseparated(")");

        Ok(qb.build_query_as().fetch_all(&self.pool).await?)
    }

    async fn fetch_actions(&self, campaign_ids: &[&str]) -> DbResult<Vec<ActionRow>> {
        let mut qb = sqlx::QueryBuilder::new(
            "SELECT campaign_id, discount_type, discount_value, max_discount, applies_to \
             FROM campaign_actions WHERE campaign_id IN (",
        );
        let mut sep = qb.separated(", ");
        for id in campaign_ids {
            sep.push_bind(*id);
        }
        sep.push_unseparated(") ORDER BY sort_order ASC");

        Ok(qb.build_query_as().fetch_all(&self.pool).await?)
    }
}

/// Serializes the payload half of a rule for storage.
///
/// The domain type serializes as `{"rule_type": ..., "value": {...}}`;
/// the table stores `rule_type` and `value` in separate columns.
fn rule_payload_json(rule: &CampaignRule) -> String {
    rule.value
        .as_ref()
        .and_then(|v| serde_json::to_value(v).ok())
        .and_then(|tagged| tagged.get("value").cloned())
        .unwrap_or(serde_json::Value::Null)
        .to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
