//! HTTP client for the auth and resource services
//!
//! Every call loads the stored session and, when there is one, sends its
//! token as a bearer header. A 401 on a call that carried a token means the
//! session is no longer valid: the stored credentials are dropped and the
//! caller gets [`ClientError::Unauthorized`] so it can route back to login.

use std::sync::Arc;

use domain::{
    AuthResponse, FavoriteRequest, FavoritesResponse, LikeResponse, LoginRequest, Menu,
    MenuQuery, MenuWithRestaurant, MessageResponse, NewMenu, NewRestaurant,
    ParsedMenuResponse, RegisterRequest, Restaurant, RestaurantQuery, Review, ReviewView,
    UpdateMenu, UpdateProfileRequest, UpdateRestaurant, UserProfile,
};
use reqwest::{
    RequestBuilder, StatusCode,
    multipart::{Form, Part},
};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    config::ClientConfig,
    credentials::{CredentialStore, Credentials},
    error::{ClientError, ClientResult},
};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Whether a request should carry the stored session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Session {
    Attach,
    Anonymous,
}

/// Fields of a new review; photos are sent as file parts
#[derive(Debug, Clone, Default)]
pub struct ReviewSubmission {
    pub restaurant_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub menu_id: Option<Uuid>,
    pub photos: Vec<PhotoFile>,
}

#[derive(Debug, Clone)]
pub struct PhotoFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Gallery of a restaurant after a photo upload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PhotoGallery {
    pub message: String,
    pub photos: Vec<String>,
}

#[derive(Clone)]
pub struct MenuApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    credentials: Arc<dyn CredentialStore>,
}

impl MenuApiClient {
    pub fn new(config: ClientConfig, credentials: Arc<dyn CredentialStore>) -> ClientResult<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config,
            credentials,
        })
    }

    /// Session currently on disk, if any
    pub async fn session(&self) -> ClientResult<Option<Credentials>> {
        self.credentials.load().await
    }

    // Account

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        let builder = self.http.post(self.config.auth("/api/users/register")).json(request);
        let auth: AuthResponse = self.send(builder, Session::Anonymous).await?;
        self.credentials.save(&Credentials::from(&auth)).await?;
        Ok(auth)
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let builder = self.http.post(self.config.auth("/api/users/login")).json(&request);
        let auth: AuthResponse = self.send(builder, Session::Anonymous).await?;
        self.credentials.save(&Credentials::from(&auth)).await?;
        Ok(auth)
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.credentials.clear().await
    }

    pub async fn profile(&self) -> ClientResult<UserProfile> {
        let builder = self.http.get(self.config.auth("/api/users/profile"));
        self.send(builder, Session::Attach).await
    }

    /// Update the profile and keep the freshly issued token
    pub async fn update_profile(&self, changes: &UpdateProfileRequest) -> ClientResult<AuthResponse> {
        let builder = self.http.put(self.config.auth("/api/users/profile")).json(changes);
        let auth: AuthResponse = self.send(builder, Session::Attach).await?;
        self.credentials.save(&Credentials::from(&auth)).await?;
        Ok(auth)
    }

    // Menus

    pub async fn menus(&self, query: &MenuQuery) -> ClientResult<Vec<MenuWithRestaurant>> {
        let builder = self.http.get(self.config.api("/api/menus")).query(query);
        self.send(builder, Session::Attach).await
    }

    pub async fn today_menus(&self) -> ClientResult<Vec<MenuWithRestaurant>> {
        let builder = self.http.get(self.config.api("/api/menus/today"));
        self.send(builder, Session::Attach).await
    }

    pub async fn menu(&self, id: Uuid) -> ClientResult<MenuWithRestaurant> {
        let builder = self.http.get(self.config.api(&format!("/api/menus/{id}")));
        self.send(builder, Session::Attach).await
    }

    pub async fn menus_for_restaurant(
        &self,
        restaurant_id: Uuid,
    ) -> ClientResult<Vec<MenuWithRestaurant>> {
        let path = format!("/api/menus/restaurant/{restaurant_id}");
        let builder = self.http.get(self.config.api(&path));
        self.send(builder, Session::Attach).await
    }

    /// Send a photographed menu for text extraction; nothing is saved yet
    pub async fn upload_menu_photo(
        &self,
        restaurant_id: Uuid,
        photo: PhotoFile,
    ) -> ClientResult<ParsedMenuResponse> {
        let form = Form::new()
            .text("restaurant_id", restaurant_id.to_string())
            .part("photo", photo_part(photo)?);
        let builder = self.http.post(self.config.api("/api/menus/upload")).multipart(form);
        self.send(builder, Session::Attach).await
    }

    pub async fn create_menu(&self, menu: &NewMenu, photo: Option<PhotoFile>) -> ClientResult<Menu> {
        let mut form = new_menu_form(menu);
        if let Some(photo) = photo {
            form = form.part("photo", photo_part(photo)?);
        }
        let builder = self.http.post(self.config.api("/api/menus")).multipart(form);
        self.send(builder, Session::Attach).await
    }

    /// Only the fields set in `changes` are sent
    pub async fn update_menu(
        &self,
        id: Uuid,
        changes: &UpdateMenu,
        photo: Option<PhotoFile>,
    ) -> ClientResult<Menu> {
        let mut form = menu_changes_form(changes);
        if let Some(photo) = photo {
            form = form.part("photo", photo_part(photo)?);
        }
        let builder = self
            .http
            .put(self.config.api(&format!("/api/menus/{id}")))
            .multipart(form);
        self.send(builder, Session::Attach).await
    }

    pub async fn delete_menu(&self, id: Uuid) -> ClientResult<MessageResponse> {
        let builder = self.http.delete(self.config.api(&format!("/api/menus/{id}")));
        self.send(builder, Session::Attach).await
    }

    // Restaurants

    pub async fn restaurants(&self, query: &RestaurantQuery) -> ClientResult<Vec<Restaurant>> {
        let builder = self.http.get(self.config.api("/api/restaurants")).query(query);
        self.send(builder, Session::Attach).await
    }

    pub async fn restaurant(&self, id: Uuid) -> ClientResult<Restaurant> {
        let builder = self.http.get(self.config.api(&format!("/api/restaurants/{id}")));
        self.send(builder, Session::Attach).await
    }

    /// Restaurants within `distance_km` of a point, nearest first
    pub async fn nearby_restaurants(
        &self,
        latitude: f64,
        longitude: f64,
        distance_km: f64,
    ) -> ClientResult<Vec<Restaurant>> {
        let builder = self
            .http
            .get(self.config.api("/api/restaurants/nearby"))
            .query(&[("lat", latitude), ("lng", longitude), ("distance", distance_km)]);
        self.send(builder, Session::Attach).await
    }

    pub async fn create_restaurant(&self, restaurant: &NewRestaurant) -> ClientResult<Restaurant> {
        let builder = self.http.post(self.config.api("/api/restaurants")).json(restaurant);
        self.send(builder, Session::Attach).await
    }

    pub async fn update_restaurant(
        &self,
        id: Uuid,
        changes: &UpdateRestaurant,
    ) -> ClientResult<Restaurant> {
        let builder = self
            .http
            .put(self.config.api(&format!("/api/restaurants/{id}")))
            .json(changes);
        self.send(builder, Session::Attach).await
    }

    pub async fn delete_restaurant(&self, id: Uuid) -> ClientResult<MessageResponse> {
        let builder = self.http.delete(self.config.api(&format!("/api/restaurants/{id}")));
        self.send(builder, Session::Attach).await
    }

    pub async fn upload_restaurant_photo(
        &self,
        id: Uuid,
        photo: PhotoFile,
    ) -> ClientResult<PhotoGallery> {
        let form = Form::new().part("photo", photo_part(photo)?);
        let builder = self
            .http
            .post(self.config.api(&format!("/api/restaurants/{id}/photos")))
            .multipart(form);
        self.send(builder, Session::Attach).await
    }

    // Favorites

    pub async fn favorites(&self) -> ClientResult<Vec<Restaurant>> {
        let builder = self.http.get(self.config.api("/api/users/favorites"));
        self.send(builder, Session::Attach).await
    }

    pub async fn add_favorite(&self, restaurant_id: Uuid) -> ClientResult<FavoritesResponse> {
        let builder = self
            .http
            .post(self.config.api("/api/users/favorites"))
            .json(&FavoriteRequest { restaurant_id });
        self.send(builder, Session::Attach).await
    }

    pub async fn remove_favorite(&self, restaurant_id: Uuid) -> ClientResult<FavoritesResponse> {
        let path = format!("/api/users/favorites/{restaurant_id}");
        let builder = self.http.delete(self.config.api(&path));
        self.send(builder, Session::Attach).await
    }

    // Reviews

    pub async fn reviews_for_restaurant(&self, restaurant_id: Uuid) -> ClientResult<Vec<ReviewView>> {
        let path = format!("/api/reviews/restaurant/{restaurant_id}");
        let builder = self.http.get(self.config.api(&path));
        self.send(builder, Session::Attach).await
    }

    pub async fn create_review(&self, review: ReviewSubmission) -> ClientResult<Review> {
        let mut form = Form::new()
            .text("restaurant_id", review.restaurant_id.to_string())
            .text("rating", review.rating.to_string());
        if let Some(comment) = review.comment {
            form = form.text("comment", comment);
        }
        if let Some(menu_id) = review.menu_id {
            form = form.text("menu_id", menu_id.to_string());
        }
        for photo in review.photos {
            form = form.part("photos", photo_part(photo)?);
        }

        let builder = self.http.post(self.config.api("/api/reviews")).multipart(form);
        self.send(builder, Session::Attach).await
    }

    pub async fn like_review(&self, id: Uuid) -> ClientResult<LikeResponse> {
        let builder = self.http.post(self.config.api(&format!("/api/reviews/{id}/like")));
        self.send(builder, Session::Attach).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        mut builder: RequestBuilder,
        session: Session,
    ) -> ClientResult<T> {
        let mut authenticated = false;
        if session == Session::Attach {
            if let Some(credentials) = self.credentials.load().await? {
                builder = builder.bearer_auth(credentials.token);
                authenticated = true;
            }
        }

        let response = builder.send().await?;
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url().path());

        if status.is_success() {
            return Ok(response.json().await?);
        }

        if status == StatusCode::UNAUTHORIZED && authenticated {
            warn!("Stored session was rejected; clearing credentials");
            self.credentials.clear().await?;
            return Err(ClientError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn photo_part(photo: PhotoFile) -> ClientResult<Part> {
    Ok(Part::bytes(photo.bytes)
        .file_name(photo.file_name)
        .mime_str(&photo.content_type)?)
}

/// One part per value; an empty list is sent as a single blank part
fn list_field(mut form: Form, key: &'static str, values: &[String]) -> Form {
    if values.is_empty() {
        return form.text(key, "");
    }
    for value in values {
        form = form.text(key, value.clone());
    }
    form
}

fn optional_text(form: Form, key: &'static str, value: Option<&String>) -> Form {
    match value {
        Some(value) => form.text(key, value.clone()),
        None => form,
    }
}

fn new_menu_form(menu: &NewMenu) -> Form {
    let mut form = Form::new()
        .text("restaurant_id", menu.restaurant_id.to_string())
        .text("type", menu.menu_type.as_str())
        .text("starter", menu.starter.clone())
        .text("main", menu.main.clone())
        .text("price", menu.price.to_string())
        .text("is_exclusive", menu.is_exclusive.to_string())
        .text("includes_drink", menu.includes_drink.to_string());
    form = optional_text(form, "dessert", menu.dessert.as_ref());
    form = optional_text(form, "hours", menu.hours.as_ref());
    form = optional_text(form, "additional_info", menu.additional_info.as_ref());
    if let Some(date) = menu.date {
        form = form.text("date", date.to_rfc3339());
    }
    form = list_field(form, "tags", &menu.tags);
    list_field(form, "drink_options", &menu.drink_options)
}

fn menu_changes_form(changes: &UpdateMenu) -> Form {
    let mut form = Form::new();
    if let Some(menu_type) = changes.menu_type {
        form = form.text("type", menu_type.as_str());
    }
    form = optional_text(form, "starter", changes.starter.as_ref());
    form = optional_text(form, "main", changes.main.as_ref());
    form = optional_text(form, "dessert", changes.dessert.as_ref());
    form = optional_text(form, "hours", changes.hours.as_ref());
    form = optional_text(form, "additional_info", changes.additional_info.as_ref());
    if let Some(price) = changes.price {
        form = form.text("price", price.to_string());
    }
    if let Some(flag) = changes.is_exclusive {
        form = form.text("is_exclusive", flag.to_string());
    }
    if let Some(flag) = changes.includes_drink {
        form = form.text("includes_drink", flag.to_string());
    }
    if let Some(date) = changes.date {
        form = form.text("date", date.to_rfc3339());
    }
    if let Some(tags) = &changes.tags {
        form = list_field(form, "tags", tags);
    }
    if let Some(options) = &changes.drink_options {
        form = list_field(form, "drink_options", options);
    }
    form
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        extract::{Multipart, Path},
        http::{HeaderMap, StatusCode as AxumStatus},
        response::{IntoResponse, Response},
        routing::{delete, get, post},
    };
    use chrono::{TimeZone, Utc};
    use domain::{Location, MenuType, OpeningHours, ParsedMenu, Role, SubscriptionTier};
    use serde_json::json;
    use tokio::net::TcpListener;

    use super::*;
    use crate::credentials::FileCredentialStore;

    const TOKEN: &str = "token-abc";

    fn auth_response() -> AuthResponse {
        AuthResponse {
            id: Uuid::nil(),
            name: "Lucía".into(),
            email: "lucia@example.com".into(),
            role: Role::User,
            favorites: vec![],
            profile_picture: None,
            token: TOKEN.into(),
        }
    }

    fn unauthorized(message: &str) -> Response {
        (AxumStatus::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
    }

    async fn login(Json(body): Json<LoginRequest>) -> Response {
        if body.password == "secret123" {
            Json(auth_response()).into_response()
        } else {
            unauthorized("Invalid email or password")
        }
    }

    async fn today(headers: HeaderMap) -> Response {
        let bearer = format!("Bearer {TOKEN}");
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some(value) if value == bearer => Json(json!([])).into_response(),
            _ => unauthorized("Not authorized, no token"),
        }
    }

    fn has_token(headers: &HeaderMap) -> bool {
        let bearer = format!("Bearer {TOKEN}");
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|value| value == bearer)
    }

    /// Text fields in arrival order plus `(field, file name, content type, size)` per file
    #[derive(Default)]
    struct Received {
        fields: Vec<(String, String)>,
        files: Vec<(String, String, String, usize)>,
    }

    impl Received {
        async fn read(mut multipart: Multipart) -> Self {
            let mut received = Received::default();
            while let Some(field) = multipart.next_field().await.unwrap() {
                let name = field.name().unwrap_or_default().to_string();
                match field.file_name().map(str::to_string) {
                    Some(file_name) => {
                        let content_type = field.content_type().unwrap_or_default().to_string();
                        let size = field.bytes().await.unwrap().len();
                        received.files.push((name, file_name, content_type, size));
                    }
                    None => {
                        let value = field.text().await.unwrap();
                        received.fields.push((name, value));
                    }
                }
            }
            received
        }

        fn text(&self, key: &str) -> Option<String> {
            self.fields
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.clone())
        }

        fn all(&self, key: &str) -> Vec<String> {
            self.fields
                .iter()
                .filter(|(name, value)| name == key && !value.is_empty())
                .map(|(_, value)| value.clone())
                .collect()
        }

        fn photo_url(&self, directory: &str) -> Option<String> {
            self.files
                .first()
                .map(|(_, file_name, _, _)| format!("uploads/{directory}/{file_name}"))
        }
    }

    fn stamp() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    /// Echo a menu form back as the menu the server would have stored
    async fn menu_echo(headers: HeaderMap, multipart: Multipart) -> Response {
        if !has_token(&headers) {
            return unauthorized("Not authorized, no token");
        }
        let form = Received::read(multipart).await;
        let menu = Menu {
            id: Uuid::nil(),
            restaurant_id: form
                .text("restaurant_id")
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_default(),
            menu_type: form
                .text("type")
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_default(),
            starter: form.text("starter").unwrap_or_default(),
            main: form.text("main").unwrap_or_default(),
            dessert: form.text("dessert"),
            price: form
                .text("price")
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_default(),
            photo_url: form.photo_url("menus"),
            tags: form.all("tags"),
            is_exclusive: form.text("is_exclusive").as_deref() == Some("true"),
            hours: form.text("hours").unwrap_or_default(),
            date: form
                .text("date")
                .and_then(|raw| chrono::DateTime::parse_from_rfc3339(&raw).ok())
                .map(|date| date.with_timezone(&Utc))
                .unwrap_or_else(stamp),
            includes_drink: form.text("includes_drink").as_deref() == Some("true"),
            drink_options: form.all("drink_options"),
            additional_info: form.text("additional_info"),
            created_at: stamp(),
            updated_at: stamp(),
        };
        (AxumStatus::CREATED, Json(menu)).into_response()
    }

    async fn parse_upload(headers: HeaderMap, multipart: Multipart) -> Response {
        if !has_token(&headers) {
            return unauthorized("Not authorized, no token");
        }
        let form = Received::read(multipart).await;
        let (Some(restaurant_id), Some((_, file_name, content_type, size))) =
            (form.text("restaurant_id"), form.files.first())
        else {
            return (
                AxumStatus::BAD_REQUEST,
                Json(json!({ "error": "Photo is required" })),
            )
                .into_response();
        };
        Json(ParsedMenuResponse {
            menu: ParsedMenu {
                starter: file_name.clone(),
                main: content_type.clone(),
                dessert: None,
                price: *size as f64,
                tags: vec![],
            },
            photo_url: format!("uploads/menus/{file_name}"),
            restaurant_id: restaurant_id.parse().unwrap(),
        })
        .into_response()
    }

    async fn create_restaurant(headers: HeaderMap, Json(body): Json<NewRestaurant>) -> Response {
        if !has_token(&headers) {
            return unauthorized("Not authorized, no token");
        }
        let restaurant = Restaurant {
            id: Uuid::nil(),
            name: body.name,
            location: body.location,
            cuisine_type: body.cuisine_type,
            dietary_options: body.dietary_options,
            phone_number: body.phone_number,
            subscription_tier: SubscriptionTier::Base,
            owner: Uuid::nil(),
            description: body.description,
            photos: vec![],
            opening_hours: body.opening_hours,
            average_rating: 0.0,
            review_count: 0,
            created_at: stamp(),
            updated_at: stamp(),
        };
        (AxumStatus::CREATED, Json(restaurant)).into_response()
    }

    async fn add_gallery_photo(headers: HeaderMap, multipart: Multipart) -> Response {
        if !has_token(&headers) {
            return unauthorized("Not authorized, no token");
        }
        let form = Received::read(multipart).await;
        let mut photos = vec!["uploads/restaurants/front.jpg".to_string()];
        photos.extend(form.photo_url("restaurants"));
        Json(json!({ "message": "Photo uploaded", "photos": photos })).into_response()
    }

    async fn removed(headers: HeaderMap) -> Response {
        if !has_token(&headers) {
            return unauthorized("Not authorized, no token");
        }
        Json(MessageResponse::new("Removed")).into_response()
    }

    async fn not_owner() -> Response {
        (
            AxumStatus::FORBIDDEN,
            Json(json!({ "error": "Not authorized to modify this restaurant" })),
        )
            .into_response()
    }

    async fn restaurant(Path(_id): Path<String>) -> Response {
        (
            AxumStatus::NOT_FOUND,
            Json(json!({ "error": "Restaurant not found" })),
        )
            .into_response()
    }

    async fn spawn_server() -> String {
        let app = Router::new()
            .route("/api/users/login", post(login))
            .route(
                "/api/users/profile",
                get(|| async { unauthorized("Not authorized, token failed") }),
            )
            .route("/api/menus/today", get(today))
            .route("/api/menus", post(menu_echo))
            .route("/api/menus/upload", post(parse_upload))
            .route("/api/menus/:id", delete(removed).put(menu_echo))
            .route("/api/restaurants", post(create_restaurant))
            .route(
                "/api/restaurants/:id",
                get(restaurant).put(not_owner).delete(removed),
            )
            .route("/api/restaurants/:id/photos", post(add_gallery_photo))
            .route(
                "/api/reviews/:id/like",
                post(|| async { (AxumStatus::BAD_GATEWAY, "upstream down") }),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }

    async fn client(dir: &tempfile::TempDir) -> (MenuApiClient, Arc<FileCredentialStore>) {
        let base = spawn_server().await;
        let store = Arc::new(FileCredentialStore::new(dir.path().join("session.json")));
        let client = MenuApiClient::new(ClientConfig::new(&base, &base), store.clone()).unwrap();
        (client, store)
    }

    #[tokio::test]
    async fn login_persists_session_and_bearer_is_sent() {
        let dir = tempfile::tempdir().unwrap();
        let (client, store) = client(&dir).await;

        assert!(matches!(
            client.today_menus().await,
            Err(ClientError::Api { status: 401, .. })
        ));

        let auth = client.login("lucia@example.com", "secret123").await.unwrap();
        assert_eq!(auth.token, TOKEN);
        assert_eq!(store.load().await.unwrap().unwrap().token, TOKEN);

        assert!(client.today_menus().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_session_is_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let (client, store) = client(&dir).await;
        client.login("lucia@example.com", "secret123").await.unwrap();

        let err = client.profile().await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized));
        assert_eq!(err.status(), Some(401));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_login_surfaces_server_message() {
        let dir = tempfile::tempdir().unwrap();
        let (client, store) = client(&dir).await;

        match client.login("lucia@example.com", "wrong").await {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid email or password");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn error_messages_are_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let (client, _) = client(&dir).await;

        match client.restaurant(Uuid::new_v4()).await {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Restaurant not found");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        match client.like_review(Uuid::new_v4()).await {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    fn photo(file_name: &str) -> PhotoFile {
        PhotoFile {
            file_name: file_name.to_string(),
            content_type: "image/jpeg".into(),
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0, 0, 0],
        }
    }

    #[tokio::test]
    async fn menu_photo_upload_sends_restaurant_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let (client, _) = client(&dir).await;
        client.login("lucia@example.com", "secret123").await.unwrap();
        let restaurant_id = Uuid::new_v4();

        let parsed = client
            .upload_menu_photo(restaurant_id, photo("pizarra.jpg"))
            .await
            .unwrap();

        assert_eq!(parsed.restaurant_id, restaurant_id);
        assert_eq!(parsed.photo_url, "uploads/menus/pizarra.jpg");
        assert_eq!(parsed.menu.starter, "pizarra.jpg");
        assert_eq!(parsed.menu.main, "image/jpeg");
        assert_eq!(parsed.menu.price, 6.0);
    }

    #[tokio::test]
    async fn menu_forms_carry_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let (client, _) = client(&dir).await;
        client.login("lucia@example.com", "secret123").await.unwrap();
        let restaurant_id = Uuid::new_v4();
        let date = Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap();

        let menu = NewMenu {
            restaurant_id,
            menu_type: MenuType::Dinner,
            starter: "Salmorejo".into(),
            main: "Merluza a la romana".into(),
            dessert: Some("Flan".into()),
            price: 13.5,
            photo_url: None,
            tags: vec!["fish".into(), "house, special".into()],
            is_exclusive: true,
            hours: Some("20:00-23:00".into()),
            date: Some(date),
            includes_drink: true,
            drink_options: vec![],
            additional_info: Some("Pan incluido".into()),
        };
        let created = client
            .create_menu(&menu, Some(photo("salmorejo.jpg")))
            .await
            .unwrap();

        assert_eq!(created.restaurant_id, restaurant_id);
        assert_eq!(created.menu_type, MenuType::Dinner);
        assert_eq!(created.starter, "Salmorejo");
        assert_eq!(created.dessert.as_deref(), Some("Flan"));
        assert_eq!(created.price, 13.5);
        assert_eq!(created.tags, vec!["fish", "house, special"]);
        assert!(created.is_exclusive && created.includes_drink);
        assert_eq!(created.hours, "20:00-23:00");
        assert_eq!(created.date, date);
        assert!(created.drink_options.is_empty());
        assert_eq!(created.photo_url.as_deref(), Some("uploads/menus/salmorejo.jpg"));

        let changes = UpdateMenu {
            price: Some(11.0),
            tags: Some(vec![]),
            ..UpdateMenu::default()
        };
        let updated = client.update_menu(Uuid::new_v4(), &changes, None).await.unwrap();
        assert_eq!(updated.price, 11.0);
        assert!(updated.tags.is_empty());
        assert!(updated.starter.is_empty());
        assert!(updated.dessert.is_none());
        assert!(updated.photo_url.is_none());

        let removed = client.delete_menu(Uuid::new_v4()).await.unwrap();
        assert_eq!(removed.message, "Removed");
    }

    #[tokio::test]
    async fn restaurant_management_calls() {
        let dir = tempfile::tempdir().unwrap();
        let (client, store) = client(&dir).await;
        client.login("lucia@example.com", "secret123").await.unwrap();

        let new = NewRestaurant {
            name: "Casa Lucía".into(),
            location: Location::new(-3.7038, 40.4168, "Calle Mayor 1"),
            cuisine_type: "spanish".into(),
            dietary_options: vec![],
            phone_number: "910000000".into(),
            description: Some("Cocina casera".into()),
            opening_hours: OpeningHours::default(),
        };
        let created = client.create_restaurant(&new).await.unwrap();
        assert_eq!(created.name, "Casa Lucía");
        assert_eq!(created.location.address, "Calle Mayor 1");
        assert_eq!(created.description.as_deref(), Some("Cocina casera"));

        let gallery = client
            .upload_restaurant_photo(created.id, photo("terraza.jpg"))
            .await
            .unwrap();
        assert_eq!(gallery.message, "Photo uploaded");
        assert_eq!(
            gallery.photos,
            vec!["uploads/restaurants/front.jpg", "uploads/restaurants/terraza.jpg"]
        );

        let changes = UpdateRestaurant {
            name: Some("Casa Lucía 2".into()),
            ..UpdateRestaurant::default()
        };
        match client.update_restaurant(created.id, &changes).await {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "Not authorized to modify this restaurant");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(store.load().await.unwrap().is_some());

        let removed = client.delete_restaurant(created.id).await.unwrap();
        assert_eq!(removed.message, "Removed");
    }
}
