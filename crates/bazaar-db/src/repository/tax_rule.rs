//! # Tax Rule Repository
//!
//! Per-category GST overrides. The `category_id` primary key guarantees at
//! most one rule per category; writes are upserts.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;

use crate::error::DbResult;
use bazaar_core::types::{CategoryTaxRule, GstRate};
use bazaar_core::validation::validate_gst_rate_bps;

#[derive(Debug, sqlx::FromRow)]
struct TaxRuleRow {
    category_id: String,
    rate_bps: i64,
    created_at: DateTime<Utc>,
}

impl From<TaxRuleRow> for CategoryTaxRule {
    fn from(row: TaxRuleRow) -> Self {
        CategoryTaxRule {
            category_id: row.category_id,
            // rate_bps is validated on write, clamp is a formality
            rate: GstRate::from_bps(row.rate_bps.clamp(0, 10000) as u32),
            created_at: row.created_at,
        }
    }
}

/// Repository for category tax rule operations.
#[derive(Debug, Clone)]
pub struct TaxRuleRepository {
    pool: SqlitePool,
}

impl TaxRuleRepository {
    /// Creates a new TaxRuleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TaxRuleRepository { pool }
    }

    /// Sets the GST rate for a category, replacing any existing rule.
    pub async fn upsert(&self, category_id: &str, rate: GstRate) -> DbResult<()> {
        validate_gst_rate_bps(rate.bps())?;

        sqlx::query(
            r#"
            INSERT INTO category_tax_rules (category_id, rate_bps)
            VALUES (?1, ?2)
            ON CONFLICT (category_id) DO UPDATE SET rate_bps = excluded.rate_bps
            "#,
        )
        .bind(category_id)
        .bind(rate.bps() as i64)
        .execute(&self.pool)
        .await?;

        debug!(category_id, bps = rate.bps(), "Category tax rule upserted");
        Ok(())
    }

    /// Lists all category tax rules.
    pub async fn list(&self) -> DbResult<Vec<CategoryTaxRule>> {
        let rows: Vec<TaxRuleRow> = sqlx::query_as(
            r#"
            SELECT category_id, rate_bps, created_at
            FROM category_tax_rules
            ORDER BY category_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CategoryTaxRule::from).collect())
    }

    /// Returns the category → rate map the tax calculator consumes.
    pub async fn rate_overrides(&self) -> DbResult<HashMap<String, GstRate>> {
        let rules = self.list().await?;
        Ok(rules
            .into_iter()
            .map(|r| (r.category_id, r.rate))
            .collect())
    }

    /// Removes the rule for a category. No-op if none exists.
    pub async fn delete(&self, category_id: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM category_tax_rules WHERE category_id = ?1")
            .bind(category_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
