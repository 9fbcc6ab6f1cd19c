//! # Domain Types
//!
//! Core domain types used throughout Mobilia.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │     Product     │   │      Order      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  owner_id (FK)  │◄──│  product_id     │       │
//! │  │  email          │   │  price_cents    │   │  quantity       │       │
//! │  │  role           │   │  stock          │   │  total (derived)│       │
//! │  │  active         │   │  average_rating │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                 ▲                                       │
//! │                    ┌────────────┴────────────┐                          │
//! │          ┌─────────┴───────┐       ┌─────────┴───────┐                  │
//! │          │  ResellProduct  │       │     Review      │                  │
//! │          │  (snapshot)     │       │  rating 1..=5   │                  │
//! │          └─────────────────┘       └─────────────────┘                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! JSON field names are camelCase to match the React frontend.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Role
// =============================================================================

/// Account role; governs which operations an identity may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Shopper.
    User,
    /// Platform administrator.
    Admin,
    /// Publishes catalog products.
    Manufacturer,
    /// Creates resale listings.
    Seller,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::User, Role::Admin, Role::Manufacturer, Role::Seller];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Manufacturer => "manufacturer",
            Role::Seller => "seller",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: Role::ALL.iter().map(|r| r.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Identity
// =============================================================================

/// The verified caller of an operation, derived from a bearer token.
///
/// Passed explicitly into every operation that needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

impl Identity {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// =============================================================================
// User
// =============================================================================

/// An account record.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Stored lower-cased; unique.
    pub email: String,
    /// Argon2 PHC string. Never serialized.
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,
    pub role: Role,
    /// False until the email confirmation link is followed.
    pub active: bool,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub confirmation_token: Option<String>,
    /// Company shown on products published by a manufacturer.
    pub company_name: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Builds the identity this account authenticates as.
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog item published by a manufacturer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price in cents; always > 0.
    pub price_cents: i64,
    /// Sellable units remaining; never negative.
    pub stock: i64,
    /// Owning manufacturer's user id.
    pub owner_id: String,
    pub company_name: String,
    /// Path or URL of the product image.
    pub image: String,
    /// Running average of review ratings; 0 when unrated.
    pub average_rating: f64,
    pub total_ratings: i64,
    pub category: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether `quantity` units can be taken from stock.
    #[inline]
    pub fn can_fulfil(&self, quantity: i64) -> bool {
        quantity > 0 && self.stock >= quantity
    }
}

/// Fields supplied when publishing a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    pub stock: i64,
    #[serde(default)]
    pub image: String,
    pub category: String,
    /// Used only when the manufacturer's account has no company name.
    #[serde(default)]
    pub company_name: Option<String>,
}

/// Partial product update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub image: Option<String>,
    pub category: Option<String>,
}

impl ProductPatch {
    /// Returns true when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price_cents.is_none()
            && self.stock.is_none()
            && self.image.is_none()
            && self.category.is_none()
    }

    /// Copy with the same normalisation `create` applies: name trimmed,
    /// category trimmed and lower-cased.
    pub fn normalized(&self) -> ProductPatch {
        ProductPatch {
            name: self.name.as_ref().map(|name| name.trim().to_string()),
            category: self
                .category
                .as_ref()
                .map(|category| category.trim().to_lowercase()),
            ..self.clone()
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// Lifecycle of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
pub enum OrderStatus {
    /// Placed; stock already reserved.
    Pending,
    /// Fulfilled by the manufacturer.
    Completed,
    /// Cancelled; stock returned.
    Cancelled,
}

impl OrderStatus {
    /// Whether an order in this status may move to `next`.
    ///
    /// Only `Pending` is open; `Completed` and `Cancelled` are terminal.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Completed)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchase of one product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Buyer.
    pub user_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Product price at the time of ordering (frozen).
    pub unit_price_cents: i64,
    /// unit_price_cents × quantity, computed server-side.
    pub total_price_cents: i64,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

// =============================================================================
// Resell Product
// =============================================================================

/// A secondary listing derived from a catalog product.
///
/// Uses the snapshot pattern: name, description, price and image are copied
/// at creation and never follow later edits to the source product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ResellProduct {
    pub id: String,
    pub seller_id: String,
    pub source_product_id: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub quantity: i64,
    pub image: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl ResellProduct {
    /// Snapshots `source` into a new listing owned by `seller_id`.
    pub fn snapshot(
        id: String,
        source: &Product,
        seller_id: &str,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> Self {
        ResellProduct {
            id,
            seller_id: seller_id.to_string(),
            source_product_id: source.id.clone(),
            name: source.name.clone(),
            description: source.description.clone(),
            price_cents: source.price_cents,
            quantity,
            image: source.image.clone(),
            created_at: now,
        }
    }
}

// =============================================================================
// Review
// =============================================================================

/// A rating left by a user on a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub product_id: String,
    pub user_id: String,
    /// 1..=5
    pub rating: i64,
    pub description: String,
    pub photo: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sofa() -> Product {
        let now = Utc::now();
        Product {
            id: "p-1".to_string(),
            name: "Oslo Sofa".to_string(),
            description: "Three seater".to_string(),
            price_cents: 5000,
            stock: 10,
            owner_id: "m-1".to_string(),
            company_name: "Nordic Living".to_string(),
            image: "/img/oslo.png".to_string(),
            average_rating: 0.0,
            total_ratings: 0,
            category: "sofa".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("manufacturer".parse::<Role>().unwrap(), Role::Manufacturer);
        assert_eq!(" Seller ".parse::<Role>().unwrap(), Role::Seller);
        assert!("owner".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn test_order_status_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Completed));
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"Pending\""
        );
    }

    #[test]
    fn test_can_fulfil() {
        let product = sofa();
        assert!(product.can_fulfil(10));
        assert!(!product.can_fulfil(11));
        assert!(!product.can_fulfil(0));
    }

    #[test]
    fn test_patch_normalized() {
        let patch = ProductPatch {
            name: Some("  Oslo Sofa ".to_string()),
            price_cents: Some(6000),
            category: Some(" Sofa ".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());

        let normalized = patch.normalized();
        assert_eq!(normalized.name.as_deref(), Some("Oslo Sofa"));
        assert_eq!(normalized.category.as_deref(), Some("sofa"));
        assert_eq!(normalized.price_cents, Some(6000));
        assert_eq!(normalized.stock, None);
        assert!(ProductPatch::default().is_empty());
        assert!(ProductPatch::default().normalized().is_empty());
    }

    #[test]
    fn test_resell_snapshot_copies_fields() {
        let product = sofa();
        let listing = ResellProduct::snapshot("r-1".to_string(), &product, "s-1", 2, Utc::now());
        assert_eq!(listing.name, product.name);
        assert_eq!(listing.description, product.description);
        assert_eq!(listing.price_cents, product.price_cents);
        assert_eq!(listing.image, product.image);
        assert_eq!(listing.source_product_id, "p-1");
        assert_eq!(listing.quantity, 2);
    }

    #[test]
    fn test_user_hides_secrets() {
        let now = Utc::now();
        let user = User {
            id: "u-1".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::User,
            active: false,
            confirmation_token: Some("tok".to_string()),
            company_name: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("tok\""));
        assert_eq!(user.identity().role, Role::User);
    }
}
