//! Restaurant listing, search and management

use axum::{
    Extension, Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
};
use axum_extra::extract::WithRejection;
use domain::{
    DietaryOption, MessageResponse, NearbyFilter, NearbyQuery, NewRestaurant, Restaurant,
    RestaurantFilter, RestaurantQuery, UpdateRestaurant,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    authz::{Principal, ResourceKind},
    error::{ApiError, ApiResult},
    forms::{FileRules, FormData},
    middleware::auth_middleware,
    state::AppState,
    storage::PhotoKind,
};

use super::{discard_photos, store_photo};

pub fn router(state: &AppState) -> Router<AppState> {
    let private = Router::new()
        .route("/", post(create_restaurant))
        .route("/:id", put(update_restaurant).delete(delete_restaurant))
        .route("/:id/photos", post(upload_photo))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(list_restaurants))
        .route("/nearby", get(nearby_restaurants))
        .route("/cuisine/:cuisine_type", get(restaurants_by_cuisine))
        .route("/dietary/:option", get(restaurants_by_dietary_option))
        .route("/:id", get(get_restaurant))
        .merge(private)
}

pub async fn list_restaurants(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<RestaurantQuery>, ApiError>,
) -> ApiResult<Json<Vec<Restaurant>>> {
    let filter = RestaurantFilter::try_from(query)?;
    Ok(Json(state.restaurants.list(&filter).await?))
}

/// Restaurants within `distance` km of a point, nearest first
pub async fn nearby_restaurants(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<NearbyQuery>, ApiError>,
) -> ApiResult<Json<Vec<Restaurant>>> {
    let filter = NearbyFilter::try_from(query)?;
    Ok(Json(state.restaurants.nearby(&filter).await?))
}

pub async fn restaurants_by_cuisine(
    State(state): State<AppState>,
    WithRejection(Path(cuisine_type), _): WithRejection<Path<String>, ApiError>,
) -> ApiResult<Json<Vec<Restaurant>>> {
    let filter = RestaurantFilter {
        cuisine_type: Some(cuisine_type),
        ..RestaurantFilter::default()
    };
    Ok(Json(state.restaurants.list(&filter).await?))
}

pub async fn restaurants_by_dietary_option(
    State(state): State<AppState>,
    WithRejection(Path(option), _): WithRejection<Path<String>, ApiError>,
) -> ApiResult<Json<Vec<Restaurant>>> {
    let filter = RestaurantFilter {
        dietary_option: Some(option.parse::<DietaryOption>()?),
        ..RestaurantFilter::default()
    };
    Ok(Json(state.restaurants.list(&filter).await?))
}

pub async fn get_restaurant(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<Restaurant>> {
    Ok(Json(find_restaurant(&state, id).await?))
}

/// Register a restaurant owned by the caller
pub async fn create_restaurant(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Json(payload), _): WithRejection<Json<NewRestaurant>, ApiError>,
) -> ApiResult<(StatusCode, Json<Restaurant>)> {
    payload.validate()?;

    let restaurant = state.restaurants.create(principal.id, payload).await?;
    info!("User {} created restaurant {}", principal.id, restaurant.id);

    Ok((StatusCode::CREATED, Json(restaurant)))
}

pub async fn update_restaurant(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(changes), _): WithRejection<Json<UpdateRestaurant>, ApiError>,
) -> ApiResult<Json<Restaurant>> {
    owned_restaurant(&state, &principal, id).await?;
    changes.validate()?;

    let restaurant = state
        .restaurants
        .update(id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Restaurant"))?;

    Ok(Json(restaurant))
}

pub async fn delete_restaurant(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<MessageResponse>> {
    owned_restaurant(&state, &principal, id).await?;

    if !state.restaurants.delete(id).await? {
        return Err(ApiError::not_found("Restaurant"));
    }

    info!("User {} removed restaurant {}", principal.id, id);
    Ok(Json(MessageResponse::new("Restaurant removed")))
}

#[derive(Debug, Serialize)]
pub struct PhotoUploaded {
    message: &'static str,
    photos: Vec<String>,
}

/// Append one photo to a restaurant's gallery
pub async fn upload_photo(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(multipart, _): WithRejection<Multipart, ApiError>,
) -> ApiResult<Json<PhotoUploaded>> {
    owned_restaurant(&state, &principal, id).await?;

    let rules = FileRules {
        max_bytes: state.uploads.max_photo_bytes,
        max_files: 1,
    };
    let mut form = FormData::collect(multipart, rules).await?;
    let file = form
        .take_file("photo")
        .ok_or_else(|| ApiError::BadRequest("Please upload a photo".to_string()))?;

    let path = store_photo(&state, PhotoKind::Restaurant, &file).await?;
    let added = state
        .restaurants
        .add_photo(id, &path)
        .await
        .map_err(ApiError::from)
        .and_then(|photos| photos.ok_or_else(|| ApiError::not_found("Restaurant")));
    if added.is_err() {
        discard_photos(&state, std::slice::from_ref(&path)).await;
    }
    let photos = added?;

    Ok(Json(PhotoUploaded {
        message: "Photo uploaded",
        photos,
    }))
}

pub(crate) async fn find_restaurant(state: &AppState, id: Uuid) -> ApiResult<Restaurant> {
    state
        .restaurants
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Restaurant"))
}

/// Load a restaurant the caller may modify
pub(crate) async fn owned_restaurant(
    state: &AppState,
    principal: &Principal,
    id: Uuid,
) -> ApiResult<Restaurant> {
    let restaurant = find_restaurant(state, id).await?;
    principal.ensure_can_write(restaurant.owner, ResourceKind::Restaurant)?;
    Ok(restaurant)
}
