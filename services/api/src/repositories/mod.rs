//! Storage ports and their PostgreSQL implementations
//!
//! Handlers only see the traits below; `main` wires the `Pg*` stores and the
//! router tests wire an in-memory store.

pub mod menu;
pub mod restaurant;
pub mod review;
pub mod user;

use async_trait::async_trait;
use common::error::DatabaseResult;
use domain::{
    Menu, MenuFilter, MenuWithRestaurant, NearbyFilter, NewMenu, NewRestaurant, NewReview,
    Restaurant, RestaurantFilter, Review, ReviewView, UpdateMenu, UpdateRestaurant, UpdateReview,
};
use uuid::Uuid;

use crate::authz::Principal;

pub use menu::PgMenuStore;
pub use restaurant::PgRestaurantStore;
pub use review::PgReviewStore;
pub use user::PgUserStore;

#[async_trait]
pub trait RestaurantStore: Send + Sync {
    /// Newest first
    async fn list(&self, filter: &RestaurantFilter) -> DatabaseResult<Vec<Restaurant>>;

    /// Restaurants within the radius, nearest first
    async fn nearby(&self, filter: &NearbyFilter) -> DatabaseResult<Vec<Restaurant>>;

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<Restaurant>>;

    /// Insert with `owner` as owner and promote a plain `user` owner to `restaurant`
    async fn create(&self, owner: Uuid, restaurant: NewRestaurant) -> DatabaseResult<Restaurant>;

    async fn update(&self, id: Uuid, changes: UpdateRestaurant)
    -> DatabaseResult<Option<Restaurant>>;

    /// Delete a restaurant with its menus, reviews and favorite entries
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;

    /// Append a photo path, returning the full list
    async fn add_photo(&self, id: Uuid, path: &str) -> DatabaseResult<Option<Vec<String>>>;
}

#[async_trait]
pub trait MenuStore: Send + Sync {
    /// Matching menus, newest `date` first, each with its restaurant summary
    async fn list(&self, filter: &MenuFilter) -> DatabaseResult<Vec<MenuWithRestaurant>>;

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<MenuWithRestaurant>>;

    async fn create(&self, menu: NewMenu) -> DatabaseResult<Menu>;

    async fn update(&self, id: Uuid, changes: UpdateMenu) -> DatabaseResult<Option<Menu>>;

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
}

/// Which reviews to list; empty means all
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    pub restaurant_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

/// Review persistence. Every mutation refreshes the restaurant's rating
/// aggregate in the same transaction.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Newest first, with author and restaurant resolved
    async fn list(&self, filter: ReviewFilter) -> DatabaseResult<Vec<ReviewView>>;

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<ReviewView>>;

    /// `None` when the restaurant does not exist; a second review by the same
    /// user for the same restaurant is a `UniqueViolation`
    async fn create(&self, user_id: Uuid, review: NewReview) -> DatabaseResult<Option<Review>>;

    async fn update(&self, id: Uuid, changes: UpdateReview) -> DatabaseResult<Option<Review>>;

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;

    /// Increment likes, returning the new count
    async fn like(&self, id: Uuid) -> DatabaseResult<Option<i32>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Identity and current role of an account
    async fn principal(&self, id: Uuid) -> DatabaseResult<Option<Principal>>;

    /// Favorite restaurant ids in insertion order
    async fn favorite_ids(&self, user_id: Uuid) -> DatabaseResult<Vec<Uuid>>;

    /// Favorite restaurants in insertion order
    async fn favorite_restaurants(&self, user_id: Uuid) -> DatabaseResult<Vec<Restaurant>>;

    /// `false` when the restaurant already was a favorite
    async fn add_favorite(&self, user_id: Uuid, restaurant_id: Uuid) -> DatabaseResult<bool>;

    /// `false` when the restaurant was not a favorite
    async fn remove_favorite(&self, user_id: Uuid, restaurant_id: Uuid) -> DatabaseResult<bool>;
}
