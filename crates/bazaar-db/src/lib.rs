//! # bazaar-db: Database Layer for the Bazaar Checkout
//!
//! This crate provides database access for the Bazaar pricing service.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Bazaar Checkout Data Flow                         │
//! │                                                                         │
//! │  Request Handler (POST /api/cart/campaigns)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     bazaar-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │    │   │
//! │  │   │   (pool.rs)   │    │ (campaign.rs) │    │  (embedded)  │    │   │
//! │  │   │               │    │               │    │              │    │   │
//! │  │   │ SqlitePool    │    │ SettingsRepo  │    │ 001_init.sql │    │   │
//! │  │   │ Connection    │◄───│ TaxRuleRepo   │    │ ...          │    │   │
//! │  │   │ Management    │    │ CampaignRepo  │    │              │    │   │
//! │  │   └───────────────┘    │ ProductRepo   │    └──────────────┘    │   │
//! │  │                        └───────────────┘                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                  ./data/bazaar.db (WAL mode)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (settings, campaigns, etc.)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bazaar_db::{Database, DbConfig};
//!
//! let config = DbConfig::new("path/to/bazaar.db");
//! let db = Database::new(config).await?;
//!
//! let settings = db.settings().tax_settings().await?;
//! let candidates = db.campaigns().candidates().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::campaign::CampaignRepository;
pub use repository::product::ProductRepository;
pub use repository::settings::SettingsRepository;
pub use repository::tax_rule::TaxRuleRepository;
