//! The caller's favorite restaurants

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    middleware,
    routing::{delete, get},
};
use axum_extra::extract::WithRejection;
use domain::{FavoriteRequest, FavoritesResponse, Restaurant};
use uuid::Uuid;

use crate::{
    authz::Principal,
    error::{ApiError, ApiResult},
    middleware::auth_middleware,
    state::AppState,
};

use super::restaurants::find_restaurant;

/// Every route here needs a bearer token
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites).post(add_favorite))
        .route("/:restaurant_id", delete(remove_favorite))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<Restaurant>>> {
    Ok(Json(state.users.favorite_restaurants(principal.id).await?))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Json(payload), _): WithRejection<Json<FavoriteRequest>, ApiError>,
) -> ApiResult<Json<FavoritesResponse>> {
    find_restaurant(&state, payload.restaurant_id).await?;

    if !state
        .users
        .add_favorite(principal.id, payload.restaurant_id)
        .await?
    {
        return Err(ApiError::Conflict(
            "Restaurant already in favorites".to_string(),
        ));
    }

    favorites_response(&state, &principal, "Restaurant added to favorites").await
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Path(restaurant_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<FavoritesResponse>> {
    if !state
        .users
        .remove_favorite(principal.id, restaurant_id)
        .await?
    {
        return Err(ApiError::BadRequest(
            "Restaurant not in favorites".to_string(),
        ));
    }

    favorites_response(&state, &principal, "Restaurant removed from favorites").await
}

async fn favorites_response(
    state: &AppState,
    principal: &Principal,
    message: &str,
) -> ApiResult<Json<FavoritesResponse>> {
    Ok(Json(FavoritesResponse {
        message: message.to_string(),
        favorites: state.users.favorite_ids(principal.id).await?,
    }))
}
