//! # Review Repository
//!
//! Reviews and the product rating aggregate.
//!
//! The review insert and the running-average update share a transaction:
//! `avg' = (avg × n + rating) / (n + 1)`, `n' = n + 1`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::tx_error;
use mobilia_core::validation::{validate_description, validate_rating};
use mobilia_core::{CoreError, Identity, Review, ValidationError};

const REVIEW_COLUMNS: &str = "id, product_id, user_id, rating, description, photo, created_at";

/// Body of `POST /products/{id}/reviews`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub rating: i64,
    pub description: String,
    #[serde(default)]
    pub photo: Option<String>,
}

impl NewReview {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_rating(self.rating)?;
        if self.description.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "description".to_string(),
            });
        }
        validate_description(&self.description)
    }
}

#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReviewRepository { pool }
    }

    /// Adds `author`'s review of `product_id` and folds the rating into the
    /// product's average.
    ///
    /// ## Errors
    /// - `Domain(Validation)` for a rating outside 1..=5 or an empty description
    /// - `Domain(ProductNotFound)`
    /// - `UniqueViolation` when the author already reviewed this product
    pub async fn create(
        &self,
        author: &Identity,
        product_id: &str,
        input: &NewReview,
    ) -> DbResult<Review> {
        input.validate().map_err(CoreError::from)?;

        let review = Review {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            user_id: author.user_id.clone(),
            rating: input.rating,
            description: input.description.trim().to_string(),
            photo: input.photo.clone().filter(|p| !p.trim().is_empty()),
            created_at: Utc::now(),
        };

        let mut tx = self.pool.begin().await.map_err(tx_error)?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET average_rating = (average_rating * total_ratings + ?1) / (total_ratings + 1),
                total_ratings = total_ratings + 1
            WHERE id = ?2
            "#,
        )
        .bind(review.rating)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ProductNotFound(product_id.to_string()).into());
        }

        sqlx::query(
            r#"
            INSERT INTO reviews (id, product_id, user_id, rating, description, photo, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&review.id)
        .bind(&review.product_id)
        .bind(&review.user_id)
        .bind(review.rating)
        .bind(&review.description)
        .bind(&review.photo)
        .bind(review.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|err| match DbError::from(err) {
            DbError::UniqueViolation { .. } => DbError::duplicate("review", product_id),
            other => other,
        })?;

        tx.commit().await.map_err(tx_error)?;

        info!(product_id = %product_id, rating = review.rating, "Review added");
        Ok(review)
    }

    /// Reviews of a product, newest first.
    pub async fn list_for_product(&self, product_id: &str) -> DbResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE product_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
