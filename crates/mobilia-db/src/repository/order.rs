//! # Order Repository
//!
//! Order placement and lifecycle.
//!
//! ## Placing an Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Transaction Flow                               │
//! │                                                                         │
//! │  POST /order/place { productId, quantity: 3 }                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate quantity (1..=999)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │   ├── reserve_stock  (stock 10 → 7, or ROLLBACK)                       │
//! │   ├── quote: 3 × unit price (frozen on the order)                      │
//! │   └── INSERT order (Pending)                                           │
//! │  COMMIT                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cancelling a pending order returns its quantity to stock in the same
//! transaction as the status change.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbResult;
use crate::repository::product::{reserve_stock, restock};
use crate::repository::tx_error;
use mobilia_core::order::quote_for_product;
use mobilia_core::policy::{can_view_order, ensure_can_set_order_status};
use mobilia_core::validation::validate_quantity;
use mobilia_core::{CoreError, Identity, Order, OrderStatus, Role};

const ORDER_COLUMNS: &str = "id, user_id, product_id, quantity, unit_price_cents, \
     total_price_cents, status, created_at, updated_at";

/// Repository for orders.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Places an order for `quantity` units of `product_id`.
    ///
    /// Stock is decremented and the order inserted in one transaction. The
    /// total is always computed here from the current price.
    ///
    /// ## Errors
    /// - `Domain(Validation)` for a quantity outside 1..=999
    /// - `Domain(ProductNotFound)` when the product doesn't exist
    /// - `Domain(InsufficientStock)` when stock is short, including losing a
    ///   race for the last units
    pub async fn place(&self, buyer: &Identity, product_id: &str, quantity: i64) -> DbResult<Order> {
        validate_quantity(quantity).map_err(CoreError::from)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(tx_error)?;

        let product = reserve_stock(&mut tx, product_id, quantity, now).await?;
        let quote = quote_for_product(&product, quantity)?;

        let order = Order {
            id: Uuid::new_v4().to_string(),
            user_id: buyer.user_id.clone(),
            product_id: product.id.clone(),
            quantity,
            unit_price_cents: quote.unit_price.cents(),
            total_price_cents: quote.total.cents(),
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, user_id, product_id, quantity, unit_price_cents,
                total_price_cents, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(&order.product_id)
        .bind(order.quantity)
        .bind(order.unit_price_cents)
        .bind(order.total_price_cents)
        .bind(order.status)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await.map_err(tx_error)?;

        info!(
            order_id = %order.id,
            product_id = %order.product_id,
            quantity = quantity,
            total = %quote.total,
            remaining_stock = quote.remaining_stock,
            "Order placed"
        );
        Ok(order)
    }

    /// Orders visible to `identity`, newest first.
    ///
    /// Admins see everything; manufacturers also see orders against their
    /// products; everyone else sees their own purchases.
    pub async fn list_for(&self, identity: &Identity) -> DbResult<Vec<Order>> {
        let orders = match identity.role {
            Role::Admin => {
                sqlx::query_as::<_, Order>(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
            Role::Manufacturer => {
                sqlx::query_as::<_, Order>(&format!(
                    r#"
                    SELECT {ORDER_COLUMNS} FROM orders
                    WHERE user_id = ?1
                       OR product_id IN (SELECT id FROM products WHERE owner_id = ?1)
                    ORDER BY created_at DESC
                    "#
                ))
                .bind(&identity.user_id)
                .fetch_all(&self.pool)
                .await?
            }
            Role::User | Role::Seller => {
                sqlx::query_as::<_, Order>(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ?1 ORDER BY created_at DESC"
                ))
                .bind(&identity.user_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        debug!(count = orders.len(), user_id = %identity.user_id, "Listed orders");
        Ok(orders)
    }

    /// Loads one order, enforcing the same visibility as [`Self::list_for`].
    pub async fn get_for(&self, identity: &Identity, id: &str) -> DbResult<Order> {
        let mut conn = self.pool.acquire().await?;
        let order = find_order(&mut conn, id).await?;
        let owner = product_owner(&mut conn, &order.product_id).await?;

        if !can_view_order(identity, &order, owner.as_deref()) {
            return Err(CoreError::not_owner("order", id).into());
        }
        Ok(order)
    }

    /// Moves a pending order to `next`.
    ///
    /// The update is conditional on the order still being pending, so two
    /// concurrent cancels restock only once.
    pub async fn update_status(
        &self,
        identity: &Identity,
        id: &str,
        next: OrderStatus,
    ) -> DbResult<Order> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(tx_error)?;

        let order = find_order(&mut tx, id).await?;
        let owner = product_owner(&mut tx, &order.product_id).await?;
        ensure_can_set_order_status(identity, &order, owner.as_deref(), next)?;

        let result = sqlx::query(
            "UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
        )
        .bind(next)
        .bind(now)
        .bind(id)
        .bind(OrderStatus::Pending)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::InvalidStatusTransition {
                order_id: id.to_string(),
                from: order.status,
                to: next,
            }
            .into());
        }

        if next == OrderStatus::Cancelled {
            let restocked = restock(&mut tx, &order.product_id, order.quantity, now).await?;
            if !restocked {
                debug!(order_id = %id, "Product gone, nothing to restock");
            }
        }

        let updated = find_order(&mut tx, id).await?;
        tx.commit().await.map_err(tx_error)?;

        info!(order_id = %id, status = %next, by = %identity.user_id, "Order status changed");
        Ok(updated)
    }
}

async fn find_order(conn: &mut SqliteConnection, id: &str) -> DbResult<Order> {
    sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| CoreError::OrderNotFound(id.to_string()).into())
}

async fn product_owner(conn: &mut SqliteConnection, product_id: &str) -> DbResult<Option<String>> {
    let owner = sqlx::query_scalar("SELECT owner_id FROM products WHERE id = ?1")
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(owner)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use crate::repository::test_support::{create_product, create_user, identity, memory_db};

    #[tokio::test]
    async fn test_place_order_decrements_stock() {
        let db = memory_db().await;
        let maker = create_user(&db, "maker@example.com", Role::Manufacturer).await;
        let buyer = create_user(&db, "buyer@example.com", Role::User).await;
        let product = create_product(&db, &maker, 50, 10).await;

        let order = db.orders().place(&identity(&buyer), &product.id, 3).await.unwrap();

        assert_eq!(order.total_price_cents, 150);
        assert_eq!(order.unit_price_cents, 50);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.user_id, buyer.id);

        let product = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(product.stock, 7);
    }

    #[tokio::test]
    async fn test_insufficient_stock_leaves_no_trace() {
        let db = memory_db().await;
        let maker = create_user(&db, "maker@example.com", Role::Manufacturer).await;
        let buyer = create_user(&db, "buyer@example.com", Role::User).await;
        let product = create_product(&db, &maker, 50, 2).await;

        let err = db.orders().place(&identity(&buyer), &product.id, 5).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock { available: 2, requested: 5, .. })
        ));

        let product = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(product.stock, 2);
        assert!(db.orders().list_for(&identity(&buyer)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_place_rejects_bad_input() {
        let db = memory_db().await;
        let buyer = create_user(&db, "buyer@example.com", Role::User).await;

        let err = db.orders().place(&identity(&buyer), "missing", 1).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::ProductNotFound(_))));

        let err = db.orders().place(&identity(&buyer), "missing", 0).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_visibility() {
        let db = memory_db().await;
        let maker = create_user(&db, "maker@example.com", Role::Manufacturer).await;
        let rival = create_user(&db, "rival@example.com", Role::Manufacturer).await;
        let buyer = create_user(&db, "buyer@example.com", Role::User).await;
        let stranger = create_user(&db, "stranger@example.com", Role::User).await;
        let admin = create_user(&db, "admin@example.com", Role::Admin).await;
        let product = create_product(&db, &maker, 50, 10).await;

        let order = db.orders().place(&identity(&buyer), &product.id, 1).await.unwrap();

        assert_eq!(db.orders().list_for(&identity(&buyer)).await.unwrap().len(), 1);
        assert_eq!(db.orders().list_for(&identity(&maker)).await.unwrap().len(), 1);
        assert_eq!(db.orders().list_for(&identity(&admin)).await.unwrap().len(), 1);
        assert!(db.orders().list_for(&identity(&rival)).await.unwrap().is_empty());
        assert!(db.orders().list_for(&identity(&stranger)).await.unwrap().is_empty());

        assert!(db.orders().get_for(&identity(&maker), &order.id).await.is_ok());
        let err = db.orders().get_for(&identity(&stranger), &order.id).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::NotOwner { .. })));

        let err = db.orders().get_for(&identity(&buyer), "missing").await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::OrderNotFound(_))));
    }

    #[tokio::test]
    async fn test_cancel_restores_stock_once() {
        let db = memory_db().await;
        let maker = create_user(&db, "maker@example.com", Role::Manufacturer).await;
        let buyer = create_user(&db, "buyer@example.com", Role::User).await;
        let product = create_product(&db, &maker, 50, 10).await;
        let order = db.orders().place(&identity(&buyer), &product.id, 4).await.unwrap();

        let cancelled = db
            .orders()
            .update_status(&identity(&buyer), &order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        let stock = db.products().get_by_id(&product.id).await.unwrap().unwrap().stock;
        assert_eq!(stock, 10);

        let err = db
            .orders()
            .update_status(&identity(&buyer), &order.id, OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InvalidStatusTransition { .. })
        ));
        let stock = db.products().get_by_id(&product.id).await.unwrap().unwrap().stock;
        assert_eq!(stock, 10);
    }

    #[tokio::test]
    async fn test_complete_requires_owner_or_admin() {
        let db = memory_db().await;
        let maker = create_user(&db, "maker@example.com", Role::Manufacturer).await;
        let buyer = create_user(&db, "buyer@example.com", Role::User).await;
        let product = create_product(&db, &maker, 50, 10).await;
        let order = db.orders().place(&identity(&buyer), &product.id, 2).await.unwrap();

        let err = db
            .orders()
            .update_status(&identity(&buyer), &order.id, OrderStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::NotOwner { .. })));

        let done = db
            .orders()
            .update_status(&identity(&maker), &order.id, OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(done.status, OrderStatus::Completed);

        // Completing keeps the reservation.
        let stock = db.products().get_by_id(&product.id).await.unwrap().unwrap().stock;
        assert_eq!(stock, 8);
    }

    #[tokio::test]
    async fn test_concurrent_orders_for_last_unit() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("race.db")).max_connections(4))
            .await
            .unwrap();
        let maker = create_user(&db, "maker@example.com", Role::Manufacturer).await;
        let first = create_user(&db, "first@example.com", Role::User).await;
        let second = create_user(&db, "second@example.com", Role::User).await;
        let product = create_product(&db, &maker, 50, 1).await;

        let orders = db.orders();
        let (first, second) = (identity(&first), identity(&second));
        let (a, b) = tokio::join!(
            orders.place(&first, &product.id, 1),
            orders.place(&second, &product.id, 1),
        );

        let outcomes = [a, b];
        let successes = outcomes.iter().filter(|r| r.is_ok()).count();
        let rejected = outcomes
            .iter()
            .filter(|r| matches!(r, Err(DbError::Domain(CoreError::InsufficientStock { .. }))))
            .count();
        assert_eq!(successes, 1);
        assert_eq!(rejected, 1);

        let stock = db.products().get_by_id(&product.id).await.unwrap().unwrap().stock;
        assert_eq!(stock, 0);
        db.close().await;
    }
}
