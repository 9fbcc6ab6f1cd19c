//! # Money Module
//!
//! Prices and order totals as integer cents.
//!
//! ```text
//! Product.price_cents ──┬──► Order.unit_price_cents × quantity ──► Order.total_price_cents
//!                       │                              (checked, never wraps)
//!                       └──► ResellProduct.price_cents (snapshot)
//! ```
//!
//! A $499.99 armchair is `Money::from_cents(49999)`; three of them are
//! 149997 cents. Floats never enter the pipeline, so totals are exact.
//!
//! ```rust
//! use mobilia_core::money::Money;
//!
//! let price = Money::from_cents(49999);
//! let total = price.checked_multiply_quantity(3).unwrap();
//! assert_eq!(total.cents(), 149997);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Amount in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// `self × qty`, or `None` when the product does not fit in an `i64`.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

/// `$1234.50` style, for log lines only.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}
