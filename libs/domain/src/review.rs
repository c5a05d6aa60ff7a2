//! Reviews left by users on restaurants

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::ValidationError, rating::is_valid_rating};

/// Review document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub photos: Vec<String>,
    pub likes: i32,
    pub menu_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantRef {
    pub id: Uuid,
    pub name: String,
}

/// Review with its author and restaurant resolved for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewView {
    #[serde(flatten)]
    pub review: Review,
    pub author: Option<AuthorSummary>,
    pub restaurant: Option<RestaurantRef>,
}

/// Review creation payload; the author is always the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
    pub restaurant_id: Uuid,
    pub rating: i16,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub menu_id: Option<Uuid>,
    #[serde(default)]
    pub photos: Vec<String>,
}

impl NewReview {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_rating(self.rating)
    }
}

/// Partial review update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateReview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
}

impl UpdateReview {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.rating {
            Some(rating) => validate_rating(rating),
            None => Ok(()),
        }
    }
}

fn validate_rating(rating: i16) -> Result<(), ValidationError> {
    if !is_valid_rating(rating) {
        return Err(ValidationError::new(
            "rating",
            "Rating must be between 1 and 5",
        ));
    }
    Ok(())
}

/// Response of `POST /api/reviews/:id/like`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeResponse {
    pub message: String,
    pub likes: i32,
}
