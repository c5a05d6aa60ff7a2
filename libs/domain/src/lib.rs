//! Shared models for the Menú del Día services
//!
//! This crate holds the serde-only types exchanged between the auth
//! service, the resource API and the client library: users, restaurants,
//! menus, reviews, their request payloads and query parameters, plus the
//! rating aggregate that is denormalized onto restaurants.

pub mod error;
pub mod menu;
pub mod rating;
pub mod restaurant;
pub mod review;
pub mod user;

pub use error::ValidationError;
pub use menu::{
    Menu, MenuFilter, MenuQuery, MenuType, MenuWithRestaurant, NewMenu, ParsedMenu,
    ParsedMenuResponse, UpdateMenu,
};
pub use rating::RatingSummary;
pub use restaurant::{
    DayHours, DietaryOption, Location, NearbyFilter, NearbyQuery, NewRestaurant, OpeningHours,
    Restaurant, RestaurantFilter, RestaurantQuery, RestaurantSummary, SubscriptionTier,
    UpdateRestaurant,
};
pub use review::{
    AuthorSummary, LikeResponse, NewReview, RestaurantRef, Review, ReviewView, UpdateReview,
};
pub use user::{
    AuthResponse, FavoriteRequest, FavoritesResponse, LoginRequest, RegisterRequest, Role,
    UpdateProfileRequest, UserProfile,
};

/// Generic `{"message": ...}` body returned by delete-style endpoints
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
