//! # mobilia-db: Database Layer for Mobilia
//!
//! SQLite storage for users, catalog, orders, resale listings and reviews,
//! using sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mobilia Data Flow                                │
//! │                                                                         │
//! │  HTTP handler (POST /order/place)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     mobilia-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ UserRepo      │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo   │    │ 001_initial  │  │   │
//! │  │   │ WAL, FKs on   │    │ OrderRepo     │    │              │  │   │
//! │  │   │               │    │ ResellRepo    │    │              │  │   │
//! │  │   │               │    │ ReviewRepo    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (mobilia.db)                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mobilia_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("mobilia.db")).await?;
//! let order = db.orders().place(&identity, &product_id, 3).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::order::OrderRepository;
pub use repository::product::{ProductFilter, ProductRepository};
pub use repository::resell::ResellRepository;
pub use repository::review::{NewReview, ReviewRepository};
pub use repository::user::UserRepository;
