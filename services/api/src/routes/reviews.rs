//! Reviews, likes and the rating aggregate they feed

use axum::{
    Extension, Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
};
use axum_extra::extract::WithRejection;
use domain::{LikeResponse, MessageResponse, NewReview, Review, ReviewView, UpdateReview};
use tracing::info;
use uuid::Uuid;

use crate::{
    authz::{Principal, ResourceKind},
    error::{ApiError, ApiResult},
    forms::{FileRules, FormData, UploadedFile},
    middleware::auth_middleware,
    repositories::ReviewFilter,
    state::AppState,
    storage::PhotoKind,
};

use super::{discard_photos, restaurants::find_restaurant, store_photo};

pub fn router(state: &AppState) -> Router<AppState> {
    let private = Router::new()
        .route("/", post(create_review))
        .route("/:id", put(update_review).delete(delete_review))
        .route("/:id/like", post(like_review))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(list_reviews))
        .route("/restaurant/:restaurant_id", get(restaurant_reviews))
        .route("/user/:user_id", get(user_reviews))
        .route("/:id", get(get_review))
        .merge(private)
}

pub async fn list_reviews(State(state): State<AppState>) -> ApiResult<Json<Vec<ReviewView>>> {
    Ok(Json(state.reviews.list(ReviewFilter::default()).await?))
}

pub async fn restaurant_reviews(
    State(state): State<AppState>,
    WithRejection(Path(restaurant_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<Vec<ReviewView>>> {
    let filter = ReviewFilter {
        restaurant_id: Some(restaurant_id),
        ..ReviewFilter::default()
    };
    Ok(Json(state.reviews.list(filter).await?))
}

pub async fn user_reviews(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<Vec<ReviewView>>> {
    let filter = ReviewFilter {
        user_id: Some(user_id),
        ..ReviewFilter::default()
    };
    Ok(Json(state.reviews.list(filter).await?))
}

pub async fn get_review(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<ReviewView>> {
    Ok(Json(find_review(&state, id).await?))
}

/// Review a restaurant; one review per user and restaurant
pub async fn create_review(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(multipart, _): WithRejection<Multipart, ApiError>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    let mut form = FormData::collect(multipart, review_photo_rules(&state)).await?;

    let restaurant_id = form
        .parse::<Uuid>("restaurant_id", "Restaurant")?
        .ok_or_else(|| ApiError::BadRequest("Restaurant is required".to_string()))?;
    let rating = form
        .parse::<i16>("rating", "Rating")?
        .ok_or_else(|| ApiError::BadRequest("Rating is required".to_string()))?;

    let mut review = NewReview {
        restaurant_id,
        rating,
        comment: form.text("comment"),
        menu_id: form.parse::<Uuid>("menu_id", "Menu")?,
        photos: Vec::new(),
    };
    review.validate()?;
    find_restaurant(&state, restaurant_id).await?;

    let photos = store_review_photos(&state, form.take_files("photos")).await?;
    review.photos = photos.clone();

    let created = state
        .reviews
        .create(principal.id, review)
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                ApiError::Conflict("You have already reviewed this restaurant".to_string())
            } else {
                ApiError::Database(e)
            }
        })
        .and_then(|review| review.ok_or_else(|| ApiError::not_found("Restaurant")));
    if created.is_err() {
        discard_photos(&state, &photos).await;
    }
    let review = created?;

    info!("User {} reviewed restaurant {}", principal.id, restaurant_id);
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn update_review(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(multipart, _): WithRejection<Multipart, ApiError>,
) -> ApiResult<Json<Review>> {
    owned_review(&state, &principal, id).await?;

    let mut form = FormData::collect(multipart, review_photo_rules(&state)).await?;
    let mut changes = UpdateReview {
        rating: form.parse::<i16>("rating", "Rating")?,
        comment: form.text("comment"),
        menu_id: form.parse::<Uuid>("menu_id", "Menu")?,
        photos: None,
    };
    changes.validate()?;

    let photos = store_review_photos(&state, form.take_files("photos")).await?;
    if !photos.is_empty() {
        changes.photos = Some(photos.clone());
    }

    let updated = state
        .reviews
        .update(id, changes)
        .await
        .map_err(ApiError::from)
        .and_then(|review| review.ok_or_else(|| ApiError::not_found("Review")));
    if updated.is_err() {
        discard_photos(&state, &photos).await;
    }
    let review = updated?;

    Ok(Json(review))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<MessageResponse>> {
    owned_review(&state, &principal, id).await?;

    if !state.reviews.delete(id).await? {
        return Err(ApiError::not_found("Review"));
    }

    info!("User {} removed review {}", principal.id, id);
    Ok(Json(MessageResponse::new("Review removed")))
}

pub async fn like_review(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<LikeResponse>> {
    let likes = state
        .reviews
        .like(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review"))?;

    Ok(Json(LikeResponse {
        message: "Review liked".to_string(),
        likes,
    }))
}

async fn find_review(state: &AppState, id: Uuid) -> ApiResult<ReviewView> {
    state
        .reviews
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review"))
}

async fn owned_review(state: &AppState, principal: &Principal, id: Uuid) -> ApiResult<Review> {
    let review = find_review(state, id).await?.review;
    principal.ensure_can_write(review.user_id, ResourceKind::Review)?;
    Ok(review)
}

fn review_photo_rules(state: &AppState) -> FileRules {
    FileRules {
        max_bytes: state.uploads.max_photo_bytes,
        max_files: state.uploads.max_review_photos,
    }
}

async fn store_review_photos(state: &AppState, files: Vec<UploadedFile>) -> ApiResult<Vec<String>> {
    let mut paths = Vec::with_capacity(files.len());
    for file in &files {
        match store_photo(state, PhotoKind::Review, file).await {
            Ok(path) => paths.push(path),
            Err(e) => {
                discard_photos(state, &paths).await;
                return Err(e);
            }
        }
    }
    Ok(paths)
}
