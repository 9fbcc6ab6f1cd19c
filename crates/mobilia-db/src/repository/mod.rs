//! # Repository Module
//!
//! Database repository implementations for Mobilia.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  axum handler                                                          │
//! │       │                                                                 │
//! │       │  db.orders().place(&identity, &product_id, 3)                  │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── place(&self, buyer, product_id, quantity)                         │
//! │  ├── list_for(&self, identity)                                         │
//! │  ├── get_for(&self, identity, id)                                      │
//! │  └── update_status(&self, identity, id, status)                        │
//! │       │                                                                 │
//! │       │  SQL inside one transaction                                    │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`user::UserRepository`] - Accounts and confirmation tokens
//! - [`product::ProductRepository`] - Catalog CRUD and stock reservation
//! - [`order::OrderRepository`] - Order placement and status changes
//! - [`resell::ResellRepository`] - Resale listings
//! - [`review::ReviewRepository`] - Reviews and rating aggregation

pub mod order;
pub mod product;
pub mod resell;
pub mod review;
pub mod user;

use crate::error::DbError;

/// Maps a failed `BEGIN`/`COMMIT` to [`DbError::TransactionFailed`].
pub(crate) fn tx_error(err: sqlx::Error) -> DbError {
    DbError::TransactionFailed(err.to_string())
}
