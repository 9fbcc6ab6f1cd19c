//! # Rating Aggregation
//!
//! Products carry `average_rating` and `total_ratings`. Each new review folds
//! into the pair with an incremental running average, so no scan over
//! existing reviews is needed:
//!
//! ```text
//! avg' = (avg × n + rating) / (n + 1)
//! n'   = n + 1
//! ```
//!
//! The database applies the same formula in SQL inside the review-insert
//! transaction; [`RatingSummary::add`] is the reference implementation used
//! by tests and by callers that want to preview the result.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::validation::validate_rating;

/// Aggregate rating state of a product.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_ratings: i64,
}

impl RatingSummary {
    pub fn new(average_rating: f64, total_ratings: i64) -> Self {
        RatingSummary {
            average_rating,
            total_ratings,
        }
    }

    /// Folds one rating into the summary.
    ///
    /// ## Example
    /// ```rust
    /// use mobilia_core::rating::RatingSummary;
    ///
    /// let summary = RatingSummary::default().add(4).unwrap().add(2).unwrap();
    /// assert_eq!(summary.total_ratings, 2);
    /// assert!((summary.average_rating - 3.0).abs() < f64::EPSILON);
    /// ```
    pub fn add(self, rating: i64) -> CoreResult<Self> {
        validate_rating(rating)?;

        let n = self.total_ratings.max(0) as f64;
        let average = (self.average_rating * n + rating as f64) / (n + 1.0);

        Ok(RatingSummary {
            average_rating: average,
            total_ratings: self.total_ratings.max(0) + 1,
        })
    }

    /// Recomputes a summary from scratch.
    pub fn from_ratings(ratings: &[i64]) -> CoreResult<Self> {
        ratings
            .iter()
            .try_fold(RatingSummary::default(), |summary, &rating| summary.add(rating))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
