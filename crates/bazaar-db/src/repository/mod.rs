//! # Repository Module
//!
//! Database repository implementations for the Bazaar checkout.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Request Handler                                                       │
//! │       │                                                                 │
//! │       │  db.campaigns().candidates()                                   │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  CampaignRepository                                                    │
//! │  ├── candidates(&self)                                                 │
//! │  ├── get(&self, id)                                                    │
//! │  ├── insert(&self, campaign)                                           │
//! │  └── set_status(&self, id, status)                                     │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place                                        │
//! │  • Row → domain conversion happens at one boundary                     │
//! │  • Handlers never see raw rows                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`settings::SettingsRepository`] - Store-wide tax settings singleton
//! - [`tax_rule::TaxRuleRepository`] - Per-category GST overrides
//! - [`campaign::CampaignRepository`] - Campaigns with rules and actions
//! - [`product::ProductRepository`] - Category and collection lookups

pub mod campaign;
pub mod product;
pub mod settings;
pub mod tax_rule;
