//! # Order Pricing
//!
//! Pure arithmetic behind placing an order or creating a resale listing.
//!
//! ## Order Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Placing an Order                                 │
//! │                                                                         │
//! │  POST /order/place { productId, quantity }                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_quantity ──► price_order (THIS MODULE) ──► OrderQuote        │
//! │                              │                                          │
//! │                              ├── qty > stock → InsufficientStock        │
//! │                              └── overflow    → TotalOverflow            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  mobilia-db: one transaction                                           │
//! │    UPDATE products SET stock = stock - q WHERE id = ? AND stock >= q   │
//! │    INSERT INTO orders (...)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The quote is advisory: the database re-checks stock in the conditional
//! update, so a quote computed from a stale read can still be rejected.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::validation::validate_quantity;

/// Result of pricing a quantity of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderQuote {
    pub unit_price: Money,
    pub quantity: i64,
    pub total: Money,
    /// Stock left once the order is placed.
    pub remaining_stock: i64,
}

/// Prices `quantity` units at `unit_price` against `stock` available units.
///
/// ## Example
/// ```rust
/// use mobilia_core::money::Money;
/// use mobilia_core::order::price_order;
///
/// let quote = price_order(Money::from_cents(5000), 10, 3).unwrap();
/// assert_eq!(quote.total.cents(), 15000);
/// assert_eq!(quote.remaining_stock, 7);
///
/// assert!(price_order(Money::from_cents(5000), 2, 5).is_err());
/// ```
pub fn price_order(unit_price: Money, stock: i64, quantity: i64) -> CoreResult<OrderQuote> {
    validate_quantity(quantity)?;

    if quantity > stock {
        return Err(CoreError::InsufficientStock {
            product_id: String::new(),
            available: stock,
            requested: quantity,
        });
    }

    let total = unit_price
        .checked_multiply_quantity(quantity)
        .ok_or(CoreError::TotalOverflow {
            unit_price_cents: unit_price.cents(),
            quantity,
        })?;

    Ok(OrderQuote {
        unit_price,
        quantity,
        total,
        remaining_stock: stock - quantity,
    })
}

/// Prices an order against a loaded product, tagging stock errors with its id.
pub fn quote_for_product(product: &Product, quantity: i64) -> CoreResult<OrderQuote> {
    price_order(product.price(), product.stock, quantity).map_err(|err| match err {
        CoreError::InsufficientStock {
            available,
            requested,
            ..
        } => CoreError::InsufficientStock {
            product_id: product.id.clone(),
            available,
            requested,
        },
        other => other,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: "p-42".to_string(),
            name: "Walnut Bookcase".to_string(),
            description: String::new(),
            price_cents,
            stock,
            owner_id: "m-1".to_string(),
            company_name: "Grain & Co".to_string(),
            image: String::new(),
            average_rating: 0.0,
            total_ratings: 0,
            category: "storage".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_total_is_price_times_quantity() {
        let quote = quote_for_product(&product(50, 10), 3).unwrap();
        assert_eq!(quote.total.cents(), 150);
        assert_eq!(quote.unit_price.cents(), 50);
        assert_eq!(quote.remaining_stock, 7);
    }

    #[test]
    fn test_exact_stock_is_allowed() {
        let quote = quote_for_product(&product(1999, 4), 4).unwrap();
        assert_eq!(quote.remaining_stock, 0);
        assert_eq!(quote.total.cents(), 7996);
    }

    #[test]
    fn test_insufficient_stock_carries_product_id() {
        let err = quote_for_product(&product(50, 2), 5).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => {
                assert_eq!(product_id, "p-42");
                assert_eq!(available, 2);
                assert_eq!(requested, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_quantity_is_validation_error() {
        assert!(matches!(
            quote_for_product(&product(50, 10), 0),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            quote_for_product(&product(50, 5000), 1000),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = price_order(Money::from_cents(i64::MAX), 10, 2).unwrap_err();
        assert!(matches!(err, CoreError::TotalOverflow { quantity: 2, .. }));
    }
}
