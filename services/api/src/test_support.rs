//! In-memory stores, stub OCR services and a router harness for tests

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::{DateTime, Utc};
use common::{
    error::{DatabaseError, DatabaseResult},
    jwt::{JwtConfig, TokenService},
};
use domain::{
    AuthorSummary, DietaryOption, Location, Menu, MenuFilter, MenuType, MenuWithRestaurant,
    NearbyFilter, NewMenu, NewRestaurant, NewReview, OpeningHours, RatingSummary, Restaurant,
    RestaurantFilter, RestaurantRef, Review, ReviewView, Role, SubscriptionTier, UpdateMenu,
    UpdateRestaurant, UpdateReview,
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    authz::Principal,
    ocr::{MenuCompleter, MenuPhotoParser, OcrError, TextDetector},
    repositories::{MenuStore, RestaurantStore, ReviewFilter, ReviewStore, UserStore},
    routes::create_router,
    settings::UploadSettings,
    state::{AppState, Stores},
};

/// Radius `earthdistance` assumes, in metres
const EARTH_RADIUS_METERS: f64 = 6_378_168.0;

const MENU_TEXT: &str = "MENU DEL DIA\nEnsalada mixta\nPollo asado\nFlan\n12,50 EUR";
const MENU_COMPLETION: &str = r#"```json
{"starter": "Ensalada mixta", "main": "Pollo asado", "dessert": "Flan", "price": 12.5, "tags": ["casero"]}
```"#;

struct MemoryUser {
    name: String,
    role: Role,
}

#[derive(Default)]
struct Data {
    users: HashMap<Uuid, MemoryUser>,
    /// Insertion order; listings reverse it for newest first
    restaurants: Vec<Restaurant>,
    menus: Vec<Menu>,
    reviews: Vec<Review>,
    favorites: Vec<(Uuid, Uuid)>,
}

impl Data {
    fn restaurant(&self, id: Uuid) -> Option<&Restaurant> {
        self.restaurants.iter().find(|r| r.id == id)
    }

    fn refresh_rating(&mut self, restaurant_id: Uuid) {
        let summary = RatingSummary::from_ratings(
            self.reviews
                .iter()
                .filter(|r| r.restaurant_id == restaurant_id)
                .map(|r| r.rating),
        );
        if let Some(restaurant) = self.restaurants.iter_mut().find(|r| r.id == restaurant_id) {
            restaurant.average_rating = summary.average_rating;
            restaurant.review_count = summary.review_count;
        }
    }

    fn listing(&self, menu: &Menu) -> MenuWithRestaurant {
        MenuWithRestaurant {
            menu: menu.clone(),
            restaurant: self.restaurant(menu.restaurant_id).map(Restaurant::summary),
        }
    }

    fn view(&self, review: &Review) -> ReviewView {
        ReviewView {
            review: review.clone(),
            author: self.users.get(&review.user_id).map(|user| AuthorSummary {
                id: review.user_id,
                name: user.name.clone(),
                profile_picture: None,
            }),
            restaurant: self.restaurant(review.restaurant_id).map(|r| RestaurantRef {
                id: r.id,
                name: r.name.clone(),
            }),
        }
    }
}

/// Implements every store port over one shared set of tables
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<Data>,
}

fn distance_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lng2 - lng1).to_radians();
    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
}

fn menu_matches(filter: &MenuFilter, menu: &Menu) -> bool {
    let search_hit = |needle: &str| {
        let needle = needle.to_lowercase();
        [Some(&menu.starter), Some(&menu.main), menu.dessert.as_ref()]
            .into_iter()
            .flatten()
            .chain(menu.tags.iter())
            .any(|text| text.to_lowercase().contains(&needle))
    };

    filter.restaurant_id.is_none_or(|id| id == menu.restaurant_id)
        && filter.menu_type.is_none_or(|t| t == menu.menu_type)
        && filter.price_min.is_none_or(|min| menu.price >= min)
        && filter.price_max.is_none_or(|max| menu.price <= max)
        && (filter.tags.is_empty() || filter.tags.iter().any(|t| menu.tags.contains(t)))
        && filter.is_exclusive.is_none_or(|e| e == menu.is_exclusive)
        && filter.search.as_deref().is_none_or(search_hit)
        && filter.date_from.is_none_or(|from| menu.date >= from)
        && filter.date_to.is_none_or(|to| menu.date < to)
}

#[async_trait]
impl RestaurantStore for MemoryStore {
    async fn list(&self, filter: &RestaurantFilter) -> DatabaseResult<Vec<Restaurant>> {
        let data = self.data.lock().unwrap();
        Ok(data
            .restaurants
            .iter()
            .rev()
            .filter(|r| {
                filter
                    .cuisine_type
                    .as_deref()
                    .is_none_or(|c| c == r.cuisine_type)
                    && filter
                        .dietary_option
                        .is_none_or(|o| r.dietary_options.contains(&o))
            })
            .cloned()
            .collect())
    }

    async fn nearby(&self, filter: &NearbyFilter) -> DatabaseResult<Vec<Restaurant>> {
        let data = self.data.lock().unwrap();
        let mut hits: Vec<(f64, Restaurant)> = data
            .restaurants
            .iter()
            .map(|r| {
                let distance = distance_meters(
                    filter.latitude,
                    filter.longitude,
                    r.location.latitude(),
                    r.location.longitude(),
                );
                (distance, r.clone())
            })
            .filter(|(distance, _)| *distance <= filter.radius_meters())
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(hits.into_iter().map(|(_, r)| r).collect())
    }

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<Restaurant>> {
        Ok(self.data.lock().unwrap().restaurant(id).cloned())
    }

    async fn create(&self, owner: Uuid, restaurant: NewRestaurant) -> DatabaseResult<Restaurant> {
        let mut data = self.data.lock().unwrap();
        let now = Utc::now();
        let stored = Restaurant {
            id: Uuid::new_v4(),
            name: restaurant.name.trim().to_string(),
            location: restaurant.location,
            cuisine_type: restaurant.cuisine_type.trim().to_string(),
            dietary_options: restaurant.dietary_options,
            phone_number: restaurant.phone_number.trim().to_string(),
            subscription_tier: SubscriptionTier::default(),
            owner,
            description: restaurant.description,
            photos: Vec::new(),
            opening_hours: restaurant.opening_hours,
            average_rating: 0.0,
            review_count: 0,
            created_at: now,
            updated_at: now,
        };
        if let Some(user) = data.users.get_mut(&owner) {
            if user.role == Role::User {
                user.role = Role::Restaurant;
            }
        }
        data.restaurants.push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: UpdateRestaurant,
    ) -> DatabaseResult<Option<Restaurant>> {
        let mut data = self.data.lock().unwrap();
        let Some(restaurant) = data.restaurants.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            restaurant.name = name;
        }
        if let Some(location) = changes.location {
            restaurant.location = location;
        }
        if let Some(cuisine) = changes.cuisine_type {
            restaurant.cuisine_type = cuisine;
        }
        if let Some(options) = changes.dietary_options {
            restaurant.dietary_options = options;
        }
        if let Some(phone) = changes.phone_number {
            restaurant.phone_number = phone;
        }
        if let Some(tier) = changes.subscription_tier {
            restaurant.subscription_tier = tier;
        }
        if let Some(description) = changes.description {
            restaurant.description = Some(description);
        }
        if let Some(hours) = changes.opening_hours {
            restaurant.opening_hours = hours;
        }
        restaurant.updated_at = Utc::now();
        Ok(Some(restaurant.clone()))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut data = self.data.lock().unwrap();
        let before = data.restaurants.len();
        data.restaurants.retain(|r| r.id != id);
        if data.restaurants.len() == before {
            return Ok(false);
        }
        data.menus.retain(|m| m.restaurant_id != id);
        data.reviews.retain(|r| r.restaurant_id != id);
        data.favorites.retain(|(_, restaurant_id)| *restaurant_id != id);
        Ok(true)
    }

    async fn add_photo(&self, id: Uuid, path: &str) -> DatabaseResult<Option<Vec<String>>> {
        let mut data = self.data.lock().unwrap();
        Ok(data
            .restaurants
            .iter_mut()
            .find(|r| r.id == id)
            .map(|restaurant| {
                restaurant.photos.push(path.to_string());
                restaurant.photos.clone()
            }))
    }
}

#[async_trait]
impl MenuStore for MemoryStore {
    async fn list(&self, filter: &MenuFilter) -> DatabaseResult<Vec<MenuWithRestaurant>> {
        let data = self.data.lock().unwrap();
        let mut menus: Vec<&Menu> = data
            .menus
            .iter()
            .filter(|m| menu_matches(filter, m))
            .collect();
        menus.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(menus.into_iter().map(|m| data.listing(m)).collect())
    }

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<MenuWithRestaurant>> {
        let data = self.data.lock().unwrap();
        Ok(data.menus.iter().find(|m| m.id == id).map(|m| data.listing(m)))
    }

    async fn create(&self, menu: NewMenu) -> DatabaseResult<Menu> {
        let mut data = self.data.lock().unwrap();
        if data.restaurant(menu.restaurant_id).is_none() {
            return Err(DatabaseError::ForeignKeyViolation {
                constraint: "menus_restaurant_id_fkey".into(),
            });
        }
        let now = Utc::now();
        let stored = Menu {
            id: Uuid::new_v4(),
            restaurant_id: menu.restaurant_id,
            menu_type: menu.menu_type,
            starter: menu.starter.trim().to_string(),
            main: menu.main.trim().to_string(),
            hours: menu.hours_or_default().to_string(),
            dessert: menu.dessert,
            price: menu.price,
            photo_url: menu.photo_url,
            tags: menu.tags,
            is_exclusive: menu.is_exclusive,
            date: menu.date.unwrap_or(now),
            includes_drink: menu.includes_drink,
            drink_options: menu.drink_options,
            additional_info: menu.additional_info,
            created_at: now,
            updated_at: now,
        };
        data.menus.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: Uuid, changes: UpdateMenu) -> DatabaseResult<Option<Menu>> {
        let mut data = self.data.lock().unwrap();
        let Some(menu) = data.menus.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        if let Some(menu_type) = changes.menu_type {
            menu.menu_type = menu_type;
        }
        if let Some(starter) = changes.starter {
            menu.starter = starter;
        }
        if let Some(main) = changes.main {
            menu.main = main;
        }
        if let Some(dessert) = changes.dessert {
            menu.dessert = Some(dessert);
        }
        if let Some(price) = changes.price {
            menu.price = price;
        }
        if let Some(photo_url) = changes.photo_url {
            menu.photo_url = Some(photo_url);
        }
        if let Some(tags) = changes.tags {
            menu.tags = tags;
        }
        if let Some(is_exclusive) = changes.is_exclusive {
            menu.is_exclusive = is_exclusive;
        }
        if let Some(hours) = changes.hours {
            menu.hours = hours;
        }
        if let Some(date) = changes.date {
            menu.date = date;
        }
        if let Some(includes_drink) = changes.includes_drink {
            menu.includes_drink = includes_drink;
        }
        if let Some(drinks) = changes.drink_options {
            menu.drink_options = drinks;
        }
        if let Some(info) = changes.additional_info {
            menu.additional_info = Some(info);
        }
        menu.updated_at = Utc::now();
        Ok(Some(menu.clone()))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut data = self.data.lock().unwrap();
        let before = data.menus.len();
        data.menus.retain(|m| m.id != id);
        for review in data.reviews.iter_mut().filter(|r| r.menu_id == Some(id)) {
            review.menu_id = None;
        }
        Ok(data.menus.len() < before)
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn list(&self, filter: ReviewFilter) -> DatabaseResult<Vec<ReviewView>> {
        let data = self.data.lock().unwrap();
        Ok(data
            .reviews
            .iter()
            .rev()
            .filter(|r| filter.restaurant_id.is_none_or(|id| id == r.restaurant_id))
            .filter(|r| filter.user_id.is_none_or(|id| id == r.user_id))
            .map(|r| data.view(r))
            .collect())
    }

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<ReviewView>> {
        let data = self.data.lock().unwrap();
        Ok(data.reviews.iter().find(|r| r.id == id).map(|r| data.view(r)))
    }

    async fn create(&self, user_id: Uuid, review: NewReview) -> DatabaseResult<Option<Review>> {
        let mut data = self.data.lock().unwrap();
        if data.restaurant(review.restaurant_id).is_none() {
            return Ok(None);
        }
        if data
            .reviews
            .iter()
            .any(|r| r.user_id == user_id && r.restaurant_id == review.restaurant_id)
        {
            return Err(DatabaseError::UniqueViolation {
                constraint: "reviews_user_restaurant_key".into(),
            });
        }
        let now = Utc::now();
        let stored = Review {
            id: Uuid::new_v4(),
            user_id,
            restaurant_id: review.restaurant_id,
            rating: review.rating,
            comment: review.comment,
            photos: review.photos,
            likes: 0,
            menu_id: review.menu_id,
            created_at: now,
            updated_at: now,
        };
        data.reviews.push(stored.clone());
        data.refresh_rating(stored.restaurant_id);
        Ok(Some(stored))
    }

    async fn update(&self, id: Uuid, changes: UpdateReview) -> DatabaseResult<Option<Review>> {
        let mut data = self.data.lock().unwrap();
        let Some(review) = data.reviews.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if let Some(rating) = changes.rating {
            review.rating = rating;
        }
        if let Some(comment) = changes.comment {
            review.comment = Some(comment);
        }
        if let Some(menu_id) = changes.menu_id {
            review.menu_id = Some(menu_id);
        }
        if let Some(photos) = changes.photos {
            review.photos = photos;
        }
        review.updated_at = Utc::now();
        let updated = review.clone();
        data.refresh_rating(updated.restaurant_id);
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut data = self.data.lock().unwrap();
        let Some(index) = data.reviews.iter().position(|r| r.id == id) else {
            return Ok(false);
        };
        let removed = data.reviews.remove(index);
        data.refresh_rating(removed.restaurant_id);
        Ok(true)
    }

    async fn like(&self, id: Uuid) -> DatabaseResult<Option<i32>> {
        let mut data = self.data.lock().unwrap();
        Ok(data.reviews.iter_mut().find(|r| r.id == id).map(|review| {
            review.likes += 1;
            review.likes
        }))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn principal(&self, id: Uuid) -> DatabaseResult<Option<Principal>> {
        let data = self.data.lock().unwrap();
        Ok(data
            .users
            .get(&id)
            .map(|user| Principal { id, role: user.role }))
    }

    async fn favorite_ids(&self, user_id: Uuid) -> DatabaseResult<Vec<Uuid>> {
        let data = self.data.lock().unwrap();
        Ok(data
            .favorites
            .iter()
            .filter(|(user, _)| *user == user_id)
            .map(|(_, restaurant)| *restaurant)
            .collect())
    }

    async fn favorite_restaurants(&self, user_id: Uuid) -> DatabaseResult<Vec<Restaurant>> {
        let data = self.data.lock().unwrap();
        Ok(data
            .favorites
            .iter()
            .filter(|(user, _)| *user == user_id)
            .filter_map(|(_, restaurant)| data.restaurant(*restaurant).cloned())
            .collect())
    }

    async fn add_favorite(&self, user_id: Uuid, restaurant_id: Uuid) -> DatabaseResult<bool> {
        let mut data = self.data.lock().unwrap();
        if data.favorites.contains(&(user_id, restaurant_id)) {
            return Ok(false);
        }
        data.favorites.push((user_id, restaurant_id));
        Ok(true)
    }

    async fn remove_favorite(&self, user_id: Uuid, restaurant_id: Uuid) -> DatabaseResult<bool> {
        let mut data = self.data.lock().unwrap();
        let before = data.favorites.len();
        data.favorites.retain(|entry| *entry != (user_id, restaurant_id));
        Ok(data.favorites.len() < before)
    }
}

/// Returns fixed page text; blank text means nothing was detected
pub struct StubDetector(pub String);

#[async_trait]
impl TextDetector for StubDetector {
    async fn detect_text(&self, _image: &[u8]) -> Result<String, OcrError> {
        if self.0.trim().is_empty() {
            return Err(OcrError::NoTextDetected);
        }
        Ok(self.0.clone())
    }
}

/// Answers every completion with the same raw text
pub struct StubCompleter(pub String);

#[async_trait]
impl MenuCompleter for StubCompleter {
    async fn complete_menu(&self, _text: &str) -> Result<String, OcrError> {
        Ok(self.0.clone())
    }
}

/// A multipart request body and its content type
pub struct MultipartBody {
    content_type: String,
    bytes: Vec<u8>,
}

/// Encode text fields and `(field, file name, content type, content)` files
pub fn multipart_body(fields: &[(String, String)], files: &[(&str, &str, &str, &str)]) -> MultipartBody {
    let boundary = "menu-del-dia-test-boundary";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    for (name, file_name, content_type, content) in files {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n{content}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    MultipartBody {
        content_type: format!("multipart/form-data; boundary={boundary}"),
        bytes: body.into_bytes(),
    }
}

/// JSON body accepted by `POST /api/restaurants`
pub fn restaurant_payload(name: &str, latitude: f64, longitude: f64) -> Value {
    json!({
        "name": name,
        "location": { "type": "Point", "coordinates": [longitude, latitude], "address": "Calle Mayor 1" },
        "cuisine_type": "spanish",
        "dietary_options": ["vegetarian"],
        "phone_number": "+34 910 000 000"
    })
}

/// Router over in-memory stores with upload files in a temp directory
pub struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
    tokens: TokenService,
    uploads: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(MENU_TEXT, MENU_COMPLETION)
    }

    pub fn with_ocr_text(text: &str) -> Self {
        Self::build(text, MENU_COMPLETION)
    }

    pub fn with_completion(raw: &str) -> Self {
        Self::build(MENU_TEXT, raw)
    }

    fn build(text: &str, completion: &str) -> Self {
        let uploads_dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::default());
        let tokens = TokenService::new(&JwtConfig {
            secret: "api-router-test-secret".into(),
            expiry_seconds: 3600,
        })
        .unwrap();
        let parser = MenuPhotoParser::new(
            Arc::new(StubDetector(text.to_string())),
            Arc::new(StubCompleter(completion.to_string())),
        );
        let uploads = UploadSettings {
            root: uploads_dir.path().to_path_buf(),
            max_menu_photo_bytes: 1024 * 1024,
            max_photo_bytes: 1024 * 1024,
            max_review_photos: 5,
        };
        let stores = Stores {
            restaurants: store.clone(),
            menus: store.clone(),
            reviews: store.clone(),
            users: store.clone(),
        };

        Self {
            router: create_router(AppState::new(stores, tokens.clone(), parser, uploads)),
            store,
            tokens,
            uploads: uploads_dir,
        }
    }

    /// Number of files written below `uploads/<directory>`
    pub fn stored_photos(&self, directory: &str) -> usize {
        std::fs::read_dir(self.uploads.path().join(directory))
            .map(|entries| entries.filter_map(Result::ok).count())
            .unwrap_or(0)
    }

    pub fn seed_user(&self, role: Role) -> Uuid {
        let id = Uuid::new_v4();
        let mut data = self.store.data.lock().unwrap();
        let name = format!("User {}", data.users.len() + 1);
        data.users.insert(id, MemoryUser { name, role });
        id
    }

    /// A fresh account and a bearer token for it
    pub fn user(&self, role: Role) -> (Uuid, String) {
        let id = self.seed_user(role);
        (id, self.tokens.issue(id, role).unwrap())
    }

    pub fn role_of(&self, id: Uuid) -> Role {
        self.store.data.lock().unwrap().users[&id].role
    }

    pub fn seed_restaurant(&self, owner: Uuid, name: &str, location: Location) -> Restaurant {
        let now = Utc::now();
        let restaurant = Restaurant {
            id: Uuid::new_v4(),
            name: name.to_string(),
            location,
            cuisine_type: "spanish".into(),
            dietary_options: vec![DietaryOption::Vegan],
            phone_number: "+34 910 000 000".into(),
            subscription_tier: SubscriptionTier::Base,
            owner,
            description: None,
            photos: Vec::new(),
            opening_hours: OpeningHours::default(),
            average_rating: 0.0,
            review_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.store
            .data
            .lock()
            .unwrap()
            .restaurants
            .push(restaurant.clone());
        restaurant
    }

    pub fn seed_menu(&self, restaurant_id: Uuid, price: f64, date: DateTime<Utc>) -> Menu {
        let menu = Menu {
            id: Uuid::new_v4(),
            restaurant_id,
            menu_type: MenuType::Lunch,
            starter: "Sopa castellana".into(),
            main: "Cocido".into(),
            dessert: None,
            price,
            photo_url: None,
            tags: Vec::new(),
            is_exclusive: false,
            hours: "12-4 PM".into(),
            date,
            includes_drink: true,
            drink_options: Vec::new(),
            additional_info: None,
            created_at: date,
            updated_at: date,
        };
        self.store.data.lock().unwrap().menus.push(menu.clone());
        menu
    }

    /// Send a request with an optional JSON body (`Value::Null` for none)
    pub async fn json(&self, method: &str, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let builder = authorized(Request::builder().method(method).uri(uri), token);
        let request = if body.is_null() {
            builder.body(Body::empty())
        } else {
            builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
        }
        .unwrap();
        self.send(request).await
    }

    pub async fn multipart(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: MultipartBody,
    ) -> (StatusCode, Value) {
        let request = authorized(Request::builder().method(method).uri(uri), token)
            .header(header::CONTENT_TYPE, body.content_type)
            .body(Body::from(body.bytes))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}

fn authorized(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}
