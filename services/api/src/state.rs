//! Application state shared across handlers

use std::sync::Arc;

use common::jwt::TokenService;
use sqlx::PgPool;

use crate::{
    ocr::MenuPhotoParser,
    repositories::{MenuStore, RestaurantStore, ReviewStore, UserStore},
    settings::UploadSettings,
    storage::PhotoStorage,
};

/// Storage ports behind the handlers
#[derive(Clone)]
pub struct Stores {
    pub restaurants: Arc<dyn RestaurantStore>,
    pub menus: Arc<dyn MenuStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub users: Arc<dyn UserStore>,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub restaurants: Arc<dyn RestaurantStore>,
    pub menus: Arc<dyn MenuStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub users: Arc<dyn UserStore>,
    pub tokens: TokenService,
    pub storage: PhotoStorage,
    pub menu_parser: MenuPhotoParser,
    pub uploads: UploadSettings,
    /// Pinged by the health route; absent when running on in-memory stores
    pub db_pool: Option<PgPool>,
}

impl AppState {
    pub fn new(
        stores: Stores,
        tokens: TokenService,
        menu_parser: MenuPhotoParser,
        uploads: UploadSettings,
    ) -> Self {
        Self {
            restaurants: stores.restaurants,
            menus: stores.menus,
            reviews: stores.reviews,
            users: stores.users,
            tokens,
            storage: PhotoStorage::new(uploads.root.clone()),
            menu_parser,
            uploads,
            db_pool: None,
        }
    }

    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
