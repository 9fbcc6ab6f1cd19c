//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - Filtered listing (category, owner, limit)
//! - CRUD operations
//! - Atomic stock reservation shared by orders and resale listings
//!
//! ## Stock Reservation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Conditional Decrement                                │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │    UPDATE products SET stock = stock - q                               │
//! │     WHERE id = ? AND stock >= q        ← first statement takes the     │
//! │       │                                  write lock                    │
//! │       ├── 1 row  → continue (order / listing insert)                   │
//! │       └── 0 rows → missing product or not enough stock → ROLLBACK      │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  Two buyers racing for the last unit: the second UPDATE sees stock 0  │
//! │  and affects no rows.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mobilia_core::validation::{validate_new_product, validate_product_patch};
use mobilia_core::{
    CoreError, NewProduct, Product, ProductPatch, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};

pub(crate) const PRODUCT_COLUMNS: &str = "id, name, description, price_cents, stock, owner_id, \
     company_name, image, average_rating, total_ratings, category, created_at, updated_at";

/// Listing filter for `GET /products`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact category match (case-insensitive).
    pub category: Option<String>,
    /// Only products published by this user.
    pub owner_id: Option<String>,
    pub limit: u32,
}

impl Default for ProductFilter {
    fn default() -> Self {
        ProductFilter {
            category: None,
            owner_id: None,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ProductFilter {
    /// Limit clamped to `1..=MAX_PAGE_SIZE`.
    pub fn effective_limit(&self) -> u32 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let sofas = repo.list(&ProductFilter { category: Some("sofa".into()), ..Default::default() }).await?;
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products matching `filter`, ordered by name.
    pub async fn list(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE 1 = 1"));

        if let Some(category) = &filter.category {
            query
                .push(" AND category = ")
                .push_bind(category.trim().to_lowercase());
        }
        if let Some(owner_id) = &filter.owner_id {
            query.push(" AND owner_id = ").push_bind(owner_id.clone());
        }

        query
            .push(" ORDER BY name, id LIMIT ")
            .push_bind(i64::from(filter.effective_limit()));

        let products = query
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Total number of catalog products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Publishes a new product owned by `owner_id`.
    ///
    /// Name is trimmed and category lower-cased; rating starts at zero.
    pub async fn create(
        &self,
        owner_id: &str,
        company_name: &str,
        input: &NewProduct,
    ) -> DbResult<Product> {
        validate_new_product(input).map_err(CoreError::from)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            description: input.description.clone(),
            price_cents: input.price_cents,
            stock: input.stock,
            owner_id: owner_id.to_string(),
            company_name: company_name.to_string(),
            image: input.image.clone(),
            average_rating: 0.0,
            total_ratings: 0,
            category: input.category.trim().to_lowercase(),
            created_at: now,
            updated_at: now,
        };

        self.insert(&product).await?;
        info!(id = %product.id, owner = %owner_id, "Product published");
        Ok(product)
    }

    /// Inserts a fully-built product row.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, price_cents, stock, owner_id,
                company_name, image, average_rating, total_ratings, category,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.owner_id)
        .bind(&product.company_name)
        .bind(&product.image)
        .bind(product.average_rating)
        .bind(product.total_ratings)
        .bind(&product.category)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Applies `patch` to product `id` and bumps `updated_at`.
    ///
    /// Only the fields present in the patch are written, so an edit that
    /// leaves `stock` out cannot overwrite a reservation committed after the
    /// caller last read the product. Rating columns belong to the review flow.
    pub async fn update(&self, id: &str, patch: &ProductPatch) -> DbResult<Product> {
        validate_product_patch(patch).map_err(CoreError::from)?;
        let patch = patch.normalized();

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE products SET updated_at = ");
        query.push_bind(Utc::now());

        if let Some(name) = patch.name {
            query.push(", name = ").push_bind(name);
        }
        if let Some(description) = patch.description {
            query.push(", description = ").push_bind(description);
        }
        if let Some(price_cents) = patch.price_cents {
            query.push(", price_cents = ").push_bind(price_cents);
        }
        if let Some(stock) = patch.stock {
            query.push(", stock = ").push_bind(stock);
        }
        if let Some(image) = patch.image {
            query.push(", image = ").push_bind(image);
        }
        if let Some(category) = patch.category {
            query.push(", category = ").push_bind(category);
        }
        query.push(" WHERE id = ").push_bind(id.to_string());

        let result = query.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        info!(id = %id, "Product updated");
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product. Reviews go with it; orders and listings remain.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        info!(id = %id, "Product deleted");
        Ok(())
    }
}

// =============================================================================
// Transaction helpers
// =============================================================================

pub(crate) async fn find_in_tx(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(product)
}

/// Takes `quantity` units of `product_id` from stock inside the caller's
/// transaction.
///
/// Returns the product as it was before the reservation. Fails with
/// `ProductNotFound` or `InsufficientStock`; the caller must then drop the
/// transaction so nothing is committed.
pub(crate) async fn reserve_stock(
    conn: &mut SqliteConnection,
    product_id: &str,
    quantity: i64,
    now: DateTime<Utc>,
) -> DbResult<Product> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - ?1, updated_at = ?2
        WHERE id = ?3 AND stock >= ?1
        "#,
    )
    .bind(quantity)
    .bind(now)
    .bind(product_id)
    .execute(&mut *conn)
    .await?;

    let mut product = find_in_tx(conn, product_id)
        .await?
        .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

    if result.rows_affected() == 0 {
        debug!(product_id = %product_id, available = product.stock, requested = quantity, "Stock reservation rejected");
        return Err(CoreError::InsufficientStock {
            product_id: product_id.to_string(),
            available: product.stock,
            requested: quantity,
        }
        .into());
    }

    product.stock += quantity;
    Ok(product)
}

/// Puts `quantity` units back. A deleted product is silently skipped.
pub(crate) async fn restock(
    conn: &mut SqliteConnection,
    product_id: &str,
    quantity: i64,
    now: DateTime<Utc>,
) -> DbResult<bool> {
    let result = sqlx::query(
        "UPDATE products SET stock = stock + ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(quantity)
    .bind(now)
    .bind(product_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

// =============================================================================
// Unit Tests
// =============================================================================
