//! # Product Repository
//!
//! Catalog lookups the pricing engine needs: category resolution for cart
//! lines that arrive without one, and collection memberships for
//! `collection` campaign rules.
//!
//! ## Lookup Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Per-Request Catalog Resolution                             │
//! │                                                                         │
//! │  Cart arrives: [p1, p2, p3]                                            │
//! │       │                                                                 │
//! │       ├── categories_for([p1, p2, p3]) ── one IN query                 │
//! │       │      → {p1: "shoes", p3: "bags"}                               │
//! │       │                                                                 │
//! │       └── collections_for([p1, p2, p3]) ── one IN query                │
//! │              → {p1: {summer-sale}, p2: {clearance}}                    │
//! │                                                                         │
//! │  Unknown products simply don't appear in the maps; the evaluators      │
//! │  treat absence as "no category" / "in no collection".                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;

use crate::error::DbResult;
use bazaar_core::campaign::ProductCollections;

/// Repository for product catalog lookups.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product. Used by seeding and admin flows.
    pub async fn insert(
        &self,
        id: &str,
        name: &str,
        category_id: Option<&str>,
        price: Decimal,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, category_id, price)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(category_id)
        .bind(price.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Creates a collection.
    pub async fn insert_collection(&self, id: &str, name: &str) -> DbResult<()> {
        sqlx::query("INSERT INTO collections (id, name) VALUES (?1, ?2)")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Adds a product to a collection. Duplicate membership is a no-op.
    pub async fn add_to_collection(&self, product_id: &str, collection_id: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO product_collections (product_id, collection_id)
            VALUES (?1, ?2)
            ON CONFLICT (product_id, collection_id) DO NOTHING
            "#,
        )
        .bind(product_id)
        .bind(collection_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Resolves categories for a set of products.
    ///
    /// Products without a category (or unknown products) are absent from
    /// the result.
    pub async fn categories_for(&self, product_ids: &[&str]) -> DbResult<HashMap<String, String>> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut qb = sqlx::QueryBuilder::new(
            "SELECT id, category_id FROM products WHERE category_id IS NOT NULL AND id IN (",
        );
        let mut sep = qb.separated(", ");
        for id in product_ids {
            sep.push_bind(*id);
        }
        sep.push_unseparated(")");

        let rows: Vec<(String, String)> = qb.build_query_as().fetch_all(&self.pool).await?;

        debug!(
            requested = product_ids.len(),
            resolved = rows.len(),
            "Resolved product categories"
        );
        Ok(rows.into_iter().collect())
    }

    /// Fetches collection memberships for a set of products.
    pub async fn collections_for(&self, product_ids: &[&str]) -> DbResult<ProductCollections> {
        if product_ids.is_empty() {
            return Ok(ProductCollections::new());
        }

        let mut qb = sqlx::QueryBuilder::new(
            "SELECT product_id, collection_id FROM product_collections WHERE product_id IN (",
        );
        let mut sep = qb.separated(", ");
        for id in product_ids {
            sep.push_bind(*id);
        }
        sep.push_unseparated(")");

        let rows: Vec<(String, String)> = qb.build_query_as().fetch_all(&self.pool).await?;

        let mut collections = ProductCollections::new();
        for (product_id, collection_id) in rows {
            collections.insert(product_id, collection_id);
        }
        Ok(collections)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
