//! # Settings Repository
//!
//! Store-wide tax configuration. A single row pinned to `id = 1`, seeded by
//! the initial migration, so reads never miss.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bazaar_core::types::{GstRate, TaxMode, TaxSettings};
use bazaar_core::validation::{validate_gst_rate_bps, validate_gstin};

/// Raw row shape. Converted to [`TaxSettings`] at the boundary.
#[derive(Debug, sqlx::FromRow)]
struct TaxSettingsRow {
    tax_enabled: bool,
    tax_mode: String,
    default_rate_bps: i64,
    store_state: String,
    gstin: String,
}

impl TaxSettingsRow {
    fn into_settings(self) -> DbResult<TaxSettings> {
        let tax_mode = match self.tax_mode.as_str() {
            "exclusive" => TaxMode::Exclusive,
            "inclusive" => TaxMode::Inclusive,
            other => {
                return Err(DbError::invalid_data(format!("unknown tax mode: {other}")));
            }
        };

        let bps = u32::try_from(self.default_rate_bps)
            .map_err(|_| DbError::invalid_data("negative default rate"))?;

        Ok(TaxSettings {
            tax_enabled: self.tax_enabled,
            tax_mode,
            default_rate: GstRate::from_bps(bps),
            store_state: self.store_state,
            gstin: self.gstin,
        })
    }
}

fn mode_str(mode: TaxMode) -> &'static str {
    match mode {
        TaxMode::Exclusive => "exclusive",
        TaxMode::Inclusive => "inclusive",
    }
}

/// Repository for the tax settings singleton.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Fetches the store's tax settings.
    ///
    /// The row is seeded by the initial migration; if it is somehow absent
    /// the built-in defaults apply rather than failing the checkout.
    pub async fn tax_settings(&self) -> DbResult<TaxSettings> {
        let row: Option<TaxSettingsRow> = sqlx::query_as(
            r#"
            SELECT tax_enabled, tax_mode, default_rate_bps, store_state, gstin
            FROM tax_settings
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.into_settings(),
            None => {
                debug!("tax_settings row missing, using defaults");
                Ok(TaxSettings::default())
            }
        }
    }

    /// Replaces the store's tax settings.
    ///
    /// Validates the rate and GSTIN before writing.
    pub async fn update_tax_settings(&self, settings: &TaxSettings) -> DbResult<()> {
        validate_gst_rate_bps(settings.default_rate.bps())?;
        validate_gstin(&settings.gstin)?;

        sqlx::query(
            r#"
            UPDATE tax_settings
            SET tax_enabled = ?1,
                tax_mode = ?2,
                default_rate_bps = ?3,
                store_state = ?4,
                gstin = ?5,
                updated_at = datetime('now')
            WHERE id = 1
            "#,
        )
        .bind(settings.tax_enabled)
        .bind(mode_str(settings.tax_mode))
        .bind(settings.default_rate.bps() as i64)
        .bind(&settings.store_state)
        .bind(&settings.gstin)
        .execute(&self.pool)
        .await?;

        debug!(
            tax_enabled = settings.tax_enabled,
            mode = mode_str(settings.tax_mode),
            "Tax settings updated"
        );
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
