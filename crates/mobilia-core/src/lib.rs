//! # mobilia-core: Pure Business Logic for Mobilia
//!
//! Domain types and rules for the furniture marketplace, as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mobilia Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React SPA)                         │   │
//! │  │    Catalog ──► Product Page ──► Order ──► Reviews / Resell     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    mobilia-api (axum)                           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mobilia-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   order   │  │  rating   │  │  policy   │  │   │
//! │  │   │  Product  │  │  pricing  │  │  running  │  │   roles   │  │   │
//! │  │   │  Order    │  │  stock    │  │  average  │  │ ownership │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    mobilia-db (SQLite)                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Product, Order, ResellProduct, Review)
//! - [`money`] - Money type with integer arithmetic
//! - [`order`] - Order pricing and stock checks
//! - [`rating`] - Running-average rating aggregation
//! - [`policy`] - Role and ownership rules
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use mobilia_core::money::Money;
//! use mobilia_core::order::price_order;
//!
//! let unit = Money::from_cents(5000);
//! let quote = price_order(unit, 10, 3).unwrap();
//!
//! assert_eq!(quote.total.cents(), 15000);
//! assert_eq!(quote.remaining_stock, 7);
//! ```

pub mod error;
pub mod money;
pub mod order;
pub mod policy;
pub mod rating;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

/// Maximum quantity of a single product in one order or resale listing.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ORDER_QUANTITY: i64 = 999;

/// Default page size for catalog listings.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Hard cap on catalog page size.
pub const MAX_PAGE_SIZE: u32 = 500;
