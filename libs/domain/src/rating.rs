//! Aggregate rating denormalized onto restaurants
//!
//! The aggregate is always recomputed from the full set of ratings that
//! currently reference a restaurant. Stores call [`RatingSummary::from_ratings`]
//! while holding the restaurant row lock, so the stored values never drift
//! from the reviews table.

use serde::{Deserialize, Serialize};

/// Lowest accepted review rating
pub const MIN_RATING: i16 = 1;
/// Highest accepted review rating
pub const MAX_RATING: i16 = 5;

/// Mean rating and number of reviews for one restaurant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RatingSummary {
    pub average_rating: f64,
    pub review_count: i32,
}

impl RatingSummary {
    /// Compute the arithmetic mean and count of a set of ratings.
    ///
    /// An empty set yields `0.0` / `0`.
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = i16>,
    {
        let (sum, count) = ratings
            .into_iter()
            .fold((0i64, 0i32), |(sum, count), r| (sum + i64::from(r), count + 1));

        if count == 0 {
            return Self::default();
        }

        Self {
            average_rating: sum as f64 / f64::from(count),
            review_count: count,
        }
    }
}

/// Whether a rating lies in the accepted 1..=5 range
pub fn is_valid_rating(rating: i16) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}
