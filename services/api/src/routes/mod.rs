//! Resource API routes

pub mod favorites;
pub mod menus;
pub mod restaurants;
pub mod reviews;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, warn};

use crate::{
    error::{ApiError, ApiResult},
    forms::UploadedFile,
    settings::UploadSettings,
    state::AppState,
    storage::{PUBLIC_PREFIX, PhotoKind},
};

/// Headroom for text fields and multipart framing on top of file bytes
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Create the router for the resource API
pub fn create_router(state: AppState) -> Router {
    let body_limit = body_limit(&state.uploads);
    let uploads = ServeDir::new(state.storage.root());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/restaurants", restaurants::router(&state))
        .nest("/api/menus", menus::router(&state))
        .nest("/api/reviews", reviews::router(&state))
        .nest("/api/users/favorites", favorites::router(&state))
        .nest_service(&format!("/{PUBLIC_PREFIX}"), uploads)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Largest request any upload route accepts
fn body_limit(uploads: &UploadSettings) -> usize {
    let largest = uploads
        .max_menu_photo_bytes
        .max(uploads.max_photo_bytes * uploads.max_review_photos.max(1));
    largest + FORM_OVERHEAD_BYTES
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let mut body = json!({
        "status": "ok",
        "service": "api-service"
    });
    if let Some(pool) = &state.db_pool {
        let database = if common::database::health_check(pool).await {
            "up"
        } else {
            "down"
        };
        body["database"] = json!(database);
    }
    Json(body)
}

/// Write an uploaded photo, hiding disk errors from the caller
pub(crate) async fn store_photo(
    state: &AppState,
    kind: PhotoKind,
    file: &UploadedFile,
) -> ApiResult<String> {
    state.storage.save(kind, file).await.map_err(|e| {
        error!("Failed to store {:?} photo {}: {}", kind, file.file_name, e);
        ApiError::InternalServerError
    })
}

/// Delete photos stored for a request whose database write did not happen
pub(crate) async fn discard_photos(state: &AppState, paths: &[String]) {
    for path in paths {
        if let Err(e) = state.storage.remove(path).await {
            warn!("Failed to remove unused photo {}: {}", path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn body_limit_fits_the_largest_form() {
        let uploads = UploadSettings {
            root: PathBuf::from("uploads"),
            max_menu_photo_bytes: 10 * 1024 * 1024,
            max_photo_bytes: 5 * 1024 * 1024,
            max_review_photos: 5,
        };
        assert_eq!(body_limit(&uploads), 26 * 1024 * 1024);
    }
}
