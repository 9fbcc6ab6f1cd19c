//! # Resell Repository
//!
//! Secondary listings created by sellers from catalog products.
//!
//! ## Snapshot Pattern
//! ```text
//! products (live)                  resell_products (frozen)
//! ┌──────────────────────┐         ┌──────────────────────────┐
//! │ Oslo Sofa  $50.00    │  copy   │ Oslo Sofa  $50.00  ×2    │
//! │ stock 10 → 8         │ ──────► │ source_product_id        │
//! └──────────────────────┘         └──────────────────────────┘
//!            │
//!            │ later: price → $45.00
//!            ▼
//!      listing still shows $50.00
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::product::reserve_stock;
use crate::repository::tx_error;
use mobilia_core::policy::{ensure_can_delete_listing, ensure_can_resell};
use mobilia_core::validation::validate_quantity;
use mobilia_core::{CoreError, Identity, ResellProduct};

const RESELL_COLUMNS: &str =
    "id, seller_id, source_product_id, name, description, price_cents, quantity, image, created_at";

#[derive(Debug, Clone)]
pub struct ResellRepository {
    pool: SqlitePool,
}

impl ResellRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ResellRepository { pool }
    }

    /// Lists `quantity` units of `product_id` for resale by `seller`.
    ///
    /// Reserves stock and snapshots the product in one transaction; a short
    /// stock rolls back everything.
    pub async fn create(
        &self,
        seller: &Identity,
        product_id: &str,
        quantity: i64,
    ) -> DbResult<ResellProduct> {
        ensure_can_resell(seller)?;
        validate_quantity(quantity).map_err(CoreError::from)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(tx_error)?;

        let product = reserve_stock(&mut tx, product_id, quantity, now).await?;
        let listing = ResellProduct::snapshot(
            Uuid::new_v4().to_string(),
            &product,
            &seller.user_id,
            quantity,
            now,
        );

        sqlx::query(
            r#"
            INSERT INTO resell_products (
                id, seller_id, source_product_id, name, description,
                price_cents, quantity, image, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&listing.id)
        .bind(&listing.seller_id)
        .bind(&listing.source_product_id)
        .bind(&listing.name)
        .bind(&listing.description)
        .bind(listing.price_cents)
        .bind(listing.quantity)
        .bind(&listing.image)
        .bind(listing.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await.map_err(tx_error)?;

        info!(
            listing_id = %listing.id,
            source = %listing.source_product_id,
            quantity = quantity,
            "Resale listing created"
        );
        Ok(listing)
    }

    /// All listings, newest first.
    pub async fn list(&self) -> DbResult<Vec<ResellProduct>> {
        let listings = sqlx::query_as::<_, ResellProduct>(&format!(
            "SELECT {RESELL_COLUMNS} FROM resell_products ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = listings.len(), "Listed resale listings");
        Ok(listings)
    }

    pub async fn list_by_seller(&self, seller_id: &str) -> DbResult<Vec<ResellProduct>> {
        let listings = sqlx::query_as::<_, ResellProduct>(&format!(
            "SELECT {RESELL_COLUMNS} FROM resell_products WHERE seller_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(listings)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ResellProduct>> {
        let listing = sqlx::query_as::<_, ResellProduct>(&format!(
            "SELECT {RESELL_COLUMNS} FROM resell_products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(listing)
    }

    /// Removes a listing owned by `identity` (or any listing, for admins).
    ///
    /// Reserved units are not returned to the source product.
    pub async fn delete(&self, identity: &Identity, id: &str) -> DbResult<()> {
        let listing = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Resale listing", id))?;
        ensure_can_delete_listing(identity, &listing)?;

        let result = sqlx::query("DELETE FROM resell_products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Resale listing", id));
        }

        info!(listing_id = %id, by = %identity.user_id, "Resale listing deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{create_product, create_user, identity, memory_db};
    use mobilia_core::{ProductPatch, Role};

    #[tokio::test]
    async fn test_create_snapshots_and_decrements() {
        let db = memory_db().await;
        let maker = create_user(&db, "maker@example.com", Role::Manufacturer).await;
        let seller = create_user(&db, "seller@example.com", Role::Seller).await;
        let product = create_product(&db, &maker, 5000, 10).await;

        let listing = db.resell().create(&identity(&seller), &product.id, 2).await.unwrap();
        assert_eq!(listing.name, product.name);
        assert_eq!(listing.description, product.description);
        assert_eq!(listing.price_cents, 5000);
        assert_eq!(listing.image, product.image);
        assert_eq!(listing.quantity, 2);
        assert_eq!(listing.seller_id, seller.id);

        let stock = db.products().get_by_id(&product.id).await.unwrap().unwrap().stock;
        assert_eq!(stock, 8);

        // Later catalog edits don't reach the listing.
        let patch = ProductPatch {
            name: Some("Oslo Sofa II".to_string()),
            price_cents: Some(4500),
            ..Default::default()
        };
        db.products().update(&product.id, &patch).await.unwrap();

        let stored = db.resell().get_by_id(&listing.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Oslo Sofa");
        assert_eq!(stored.price_cents, 5000);
    }

    #[tokio::test]
    async fn test_create_rules() {
        let db = memory_db().await;
        let maker = create_user(&db, "maker@example.com", Role::Manufacturer).await;
        let seller = create_user(&db, "seller@example.com", Role::Seller).await;
        let buyer = create_user(&db, "buyer@example.com", Role::User).await;
        let product = create_product(&db, &maker, 5000, 2).await;

        let err = db.resell().create(&identity(&buyer), &product.id, 1).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::RoleNotAllowed { .. })));

        let err = db.resell().create(&identity(&seller), &product.id, 5).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::InsufficientStock { .. })));

        let err = db.resell().create(&identity(&seller), "missing", 1).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::ProductNotFound(_))));

        assert!(db.resell().list().await.unwrap().is_empty());
        let stock = db.products().get_by_id(&product.id).await.unwrap().unwrap().stock;
        assert_eq!(stock, 2);
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let db = memory_db().await;
        let maker = create_user(&db, "maker@example.com", Role::Manufacturer).await;
        let seller = create_user(&db, "seller@example.com", Role::Seller).await;
        let other = create_user(&db, "other@example.com", Role::Seller).await;
        let product = create_product(&db, &maker, 5000, 10).await;

        let listing = db.resell().create(&identity(&seller), &product.id, 1).await.unwrap();
        db.resell().create(&identity(&other), &product.id, 1).await.unwrap();

        assert_eq!(db.resell().list().await.unwrap().len(), 2);
        let mine = db.resell().list_by_seller(&seller.id).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, listing.id);

        let err = db.resell().delete(&identity(&other), &listing.id).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::NotOwner { .. })));

        db.resell().delete(&identity(&seller), &listing.id).await.unwrap();
        assert!(db.resell().get_by_id(&listing.id).await.unwrap().is_none());
        assert!(matches!(
            db.resell().delete(&identity(&seller), &listing.id).await,
            Err(DbError::NotFound { .. })
        ));

        // Deleting a listing does not restock.
        let stock = db.products().get_by_id(&product.id).await.unwrap().unwrap().stock;
        assert_eq!(stock, 8);
    }
}
