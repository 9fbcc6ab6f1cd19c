//! # User Repository
//!
//! Account storage: registration, email confirmation, password changes and
//! admin management. Password hashing happens in the API layer; this module
//! only ever sees PHC strings.
//!
//! ## Account Lifecycle
//! ```text
//! register ──► inactive + confirmation_token
//!                  │
//!                  │ GET /auth/confirm/{token}
//!                  ▼
//!              active, token cleared ──► login allowed
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::tx_error;
use mobilia_core::{Role, User};

const USER_COLUMNS: &str = "id, email, password_hash, role, active, confirmation_token, \
     company_name, created_at, updated_at";

/// Repository for account records.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a user. A taken email yields [`DbError::UniqueViolation`].
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, password_hash, role, active, confirmation_token,
                company_name, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.active)
        .bind(&user.confirmation_token)
        .bind(&user.company_name)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| match DbError::from(err) {
            DbError::UniqueViolation { field, .. } if field.contains("email") => {
                DbError::duplicate("email", &user.email)
            }
            other => other,
        })?;

        info!(id = %user.id, role = %user.role, "User created");
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Looks up a user by (already normalized) email.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Activates the account holding `token` and clears the token.
    ///
    /// Tokens are single use; a second confirmation is `NotFound`.
    pub async fn confirm(&self, token: &str) -> DbResult<User> {
        let mut tx = self.pool.begin().await.map_err(tx_error)?;

        let id: Option<String> =
            sqlx::query_scalar("SELECT id FROM users WHERE confirmation_token = ?1")
                .bind(token)
                .fetch_optional(&mut *tx)
                .await?;
        let id = id.ok_or_else(|| DbError::not_found("Confirmation token", token))?;

        sqlx::query(
            r#"
            UPDATE users
            SET active = 1, confirmation_token = NULL, updated_at = ?1
            WHERE id = ?2
            "#,
        )
        .bind(Utc::now())
        .bind(&id)
        .execute(&mut *tx)
        .await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(&id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await.map_err(tx_error)?;

        info!(id = %user.id, "Account confirmed");
        Ok(user)
    }

    pub async fn update_password(&self, id: &str, password_hash: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = ?1, updated_at = ?2 WHERE id = ?3",
        )
        .bind(password_hash)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        info!(id = %id, "Password changed");
        Ok(())
    }

    /// All accounts, oldest first.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, email"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    /// Deletes an account. Its products, listings and reviews cascade.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        info!(id = %id, "User deleted");
        Ok(())
    }

    /// Creates an active admin with `email` unless that email already exists.
    ///
    /// Returns true when an account was created.
    pub async fn ensure_admin(&self, email: &str, password_hash: &str) -> DbResult<bool> {
        if self.get_by_email(email).await?.is_some() {
            debug!(email = %email, "Bootstrap admin already present");
            return Ok(false);
        }

        let now = Utc::now();
        let admin = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role: Role::Admin,
            active: true,
            confirmation_token: None,
            company_name: None,
            created_at: now,
            updated_at: now,
        };

        self.insert(&admin).await?;
        info!(email = %email, "Bootstrap admin created");
        Ok(true)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
