//! # Seed Data Generator
//!
//! Populates the database with demo catalog, tax, and campaign data for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed with defaults
//! cargo run -p bazaar-db --bin seed
//!
//! # Specify database path
//! cargo run -p bazaar-db --bin seed -- --db ./data/bazaar.db
//! ```
//!
//! ## Generated Data
//! - A small catalog across categories (shoes, bags, books, electronics)
//! - Two collections (summer-sale, clearance) with memberships
//! - Tax settings: exclusive mode, 18% default, Maharashtra store
//! - Category overrides: books 0%, electronics 28%
//! - Three campaigns exercising every rule type

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use std::env;
use uuid::Uuid;

use bazaar_core::campaign::{
    AppliesTo, Campaign, CampaignAction, CampaignRule, CampaignStatus, DiscountType, RuleValue,
};
use bazaar_core::types::{GstRate, TaxMode, TaxSettings};
use bazaar_core::Money;
use bazaar_db::{Database, DbConfig};

const PRODUCTS: &[(&str, &str, Option<&str>, i64)] = &[
    ("p-sneaker", "Canvas Sneakers", Some("shoes"), 1499),
    ("p-loafer", "Leather Loafers", Some("shoes"), 2999),
    ("p-sandal", "Strap Sandals", Some("shoes"), 899),
    ("p-tote", "Cotton Tote Bag", Some("bags"), 499),
    ("p-duffel", "Travel Duffel", Some("bags"), 1999),
    ("p-novel", "Paperback Novel", Some("books"), 299),
    ("p-cookbook", "Regional Cookbook", Some("books"), 549),
    ("p-earbuds", "Wireless Earbuds", Some("electronics"), 2499),
    ("p-charger", "Fast Charger", Some("electronics"), 999),
    ("p-giftcard", "Gift Card", None, 500),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./bazaar_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bazaar Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./bazaar_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Bazaar Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.campaigns().list_all().await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} campaigns", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Catalog
    println!();
    println!("Seeding catalog...");
    let products = db.products();
    for (id, name, category, price) in PRODUCTS {
        products
            .insert(id, name, *category, Decimal::from(*price))
            .await?;
    }
    products.insert_collection("summer-sale", "Summer Sale").await?;
    products.insert_collection("clearance", "Clearance").await?;
    products.add_to_collection("p-sandal", "summer-sale").await?;
    products.add_to_collection("p-tote", "summer-sale").await?;
    products.add_to_collection("p-loafer", "clearance").await?;
    println!("  {} products, 2 collections", PRODUCTS.len());

    // Tax configuration
    println!();
    println!("Seeding tax configuration...");
    db.settings()
        .update_tax_settings(&TaxSettings {
            tax_enabled: true,
            tax_mode: TaxMode::Exclusive,
            default_rate: GstRate::from_bps(1800),
            store_state: "Maharashtra".to_string(),
            gstin: "27AAAAA0000A1Z5".to_string(),
        })
        .await?;
    db.tax_rules().upsert("books", GstRate::from_bps(0)).await?;
    db.tax_rules()
        .upsert("electronics", GstRate::from_bps(2800))
        .await?;
    println!("  Settings + 2 category overrides");

    // Campaigns
    println!();
    println!("Seeding campaigns...");
    let now = Utc::now();
    let campaigns = [
        campaign(
            "Bulk Saver",
            10,
            now,
            vec![RuleValue::MinItems { count: 3 }],
            CampaignAction {
                discount_type: DiscountType::Flat,
                discount_value: Decimal::from(100),
                max_discount: None,
                applies_to: AppliesTo::Cart,
            },
        ),
        campaign(
            "Big Cart Bonus",
            20,
            now,
            vec![RuleValue::MinCartValue {
                amount: Money::from_rupees(2000),
            }],
            CampaignAction {
                discount_type: DiscountType::Percentage,
                discount_value: Decimal::from(10),
                max_discount: Some(Decimal::from(500)),
                applies_to: AppliesTo::Cart,
            },
        ),
        campaign(
            "Summer Steals",
            5,
            now,
            vec![
                RuleValue::Collection {
                    collection_id: "summer-sale".to_string(),
                },
                RuleValue::MinCartValue {
                    amount: Money::from_rupees(750),
                },
            ],
            CampaignAction {
                discount_type: DiscountType::Percentage,
                discount_value: Decimal::from(15),
                max_discount: Some(Decimal::from(300)),
                applies_to: AppliesTo::Cart,
            },
        ),
    ];
    for c in &campaigns {
        db.campaigns().insert(c).await?;
        println!("  {} (priority {})", c.name, c.priority);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

fn campaign(
    name: &str,
    priority: i64,
    now: chrono::DateTime<Utc>,
    rules: Vec<RuleValue>,
    action: CampaignAction,
) -> Campaign {
    Campaign {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        status: CampaignStatus::Active,
        priority,
        start_at: now - Duration::days(1),
        end_at: now + Duration::days(30),
        created_at: now,
        rules: rules
            .into_iter()
            .map(|v| CampaignRule {
                rule_type: match &v {
                    RuleValue::MinItems { .. } => "min_items",
                    RuleValue::MinCartValue { .. } => "min_cart_value",
                    RuleValue::Category { .. } => "category",
                    RuleValue::Collection { .. } => "collection",
                }
                .to_string(),
                value: Some(v),
            })
            .collect(),
        actions: vec![action],
    }
}
