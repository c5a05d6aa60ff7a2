//! Daily menus: browsing, publishing and photo parsing

use axum::{
    Extension, Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, NaiveDate, Utc};
use domain::{
    Menu, MenuFilter, MenuQuery, MenuType, MenuWithRestaurant, MessageResponse, NewMenu,
    ParsedMenuResponse, UpdateMenu,
};
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

use super::{discard_photos, restaurants::find_restaurant, store_photo};

pub fn router(state: &AppState) -> Router<AppState> {
    let private = Router::new()
        .route("/", post(create_menu))
        .route("/upload", post(upload_menu_photo))
        .route("/:id", put(update_menu).delete(delete_menu))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(list_menus))
        .route("/today", get(todays_menus))
        .route("/restaurant/:restaurant_id", get(restaurant_menus))
        .route("/:id", get(get_menu))
        .merge(private)
}

/// Menus matching the query filters, newest first
pub async fn list_menus(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<MenuQuery>, ApiError>,
) -> ApiResult<Json<Vec<MenuWithRestaurant>>> {
    let filter = MenuFilter::try_from(query)?;
    Ok(Json(state.menus.list(&filter).await?))
}

/// Menus dated today (UTC)
pub async fn todays_menus(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<MenuWithRestaurant>>> {
    let filter = MenuFilter::today(Utc::now());
    Ok(Json(state.menus.list(&filter).await?))
}

pub async fn restaurant_menus(
    State(state): State<AppState>,
    WithRejection(Path(restaurant_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<Vec<MenuWithRestaurant>>> {
    let filter = MenuFilter::for_restaurant(restaurant_id);
    Ok(Json(state.menus.list(&filter).await?))
}

pub async fn get_menu(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<MenuWithRestaurant>> {
    Ok(Json(find_menu(&state, id).await?))
}

/// Publish a menu for a restaurant the caller owns
pub async fn create_menu(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(multipart, _): WithRejection<Multipart, ApiError>,
) -> ApiResult<(StatusCode, Json<Menu>)> {
    principal.require_menu_publisher()?;

    let mut form = FormData::collect(multipart, menu_photo_rules(&state)).await?;
    let restaurant_id = required_restaurant_id(&form)?;
    ensure_menu_owner(&state, &principal, restaurant_id).await?;

    let mut menu = new_menu_from_form(&form, restaurant_id)?;
    menu.validate()?;

    if let Some(photo) = form.take_file("photo") {
        menu.photo_url = Some(store_photo(&state, PhotoKind::Menu, &photo).await?);
    }
    let stored: Vec<String> = menu.photo_url.iter().cloned().collect();

    let created = state.menus.create(menu).await;
    if created.is_err() {
        discard_photos(&state, &stored).await;
    }
    let menu = created?;
    info!("User {} published menu {}", principal.id, menu.id);

    Ok((StatusCode::CREATED, Json(menu)))
}

/// Store a photographed menu and return the fields read from it
pub async fn upload_menu_photo(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(multipart, _): WithRejection<Multipart, ApiError>,
) -> ApiResult<Json<ParsedMenuResponse>> {
    principal.require_menu_publisher()?;

    let mut form = FormData::collect(multipart, menu_photo_rules(&state)).await?;
    let restaurant_id = required_restaurant_id(&form)?;
    let photo = form
        .take_file("photo")
        .ok_or_else(|| ApiError::BadRequest("Please upload a menu photo".to_string()))?;
    ensure_menu_owner(&state, &principal, restaurant_id).await?;

    let menu = state.menu_parser.parse(&photo.bytes).await?;
    let photo_url = store_photo(&state, PhotoKind::Menu, &photo).await?;

    Ok(Json(ParsedMenuResponse {
        menu,
        photo_url,
        restaurant_id,
    }))
}

pub async fn update_menu(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(multipart, _): WithRejection<Multipart, ApiError>,
) -> ApiResult<Json<Menu>> {
    principal.require_menu_publisher()?;
    owned_menu(&state, &principal, id).await?;

    let mut form = FormData::collect(multipart, menu_photo_rules(&state)).await?;
    let mut changes = menu_changes_from_form(&form)?;
    changes.validate()?;

    if let Some(photo) = form.take_file("photo") {
        changes.photo_url = Some(store_photo(&state, PhotoKind::Menu, &photo).await?);
    }
    let stored: Vec<String> = changes.photo_url.iter().cloned().collect();

    let updated = state
        .menus
        .update(id, changes)
        .await
        .map_err(ApiError::from)
        .and_then(|menu| menu.ok_or_else(|| ApiError::not_found("Menu")));
    if updated.is_err() {
        discard_photos(&state, &stored).await;
    }
    let menu = updated?;

    Ok(Json(menu))
}

pub async fn delete_menu(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<MessageResponse>> {
    principal.require_menu_publisher()?;
    owned_menu(&state, &principal, id).await?;

    if !state.menus.delete(id).await? {
        return Err(ApiError::not_found("Menu"));
    }

    info!("User {} removed menu {}", principal.id, id);
    Ok(Json(MessageResponse::new("Menu removed")))
}

async fn find_menu(state: &AppState, id: Uuid) -> ApiResult<MenuWithRestaurant> {
    state
        .menus
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Menu"))
}

/// Menus of a restaurant belong to whoever owns the restaurant
async fn ensure_menu_owner(
    state: &AppState,
    principal: &Principal,
    restaurant_id: Uuid,
) -> ApiResult<()> {
    let restaurant = find_restaurant(state, restaurant_id).await?;
    principal.ensure_can_write(restaurant.owner, ResourceKind::Menu)
}

async fn owned_menu(state: &AppState, principal: &Principal, id: Uuid) -> ApiResult<Menu> {
    let menu = find_menu(state, id).await?.menu;
    ensure_menu_owner(state, principal, menu.restaurant_id).await?;
    Ok(menu)
}

fn menu_photo_rules(state: &AppState) -> FileRules {
    FileRules {
        max_bytes: state.uploads.max_menu_photo_bytes,
        max_files: 1,
    }
}

fn required_restaurant_id(form: &FormData) -> ApiResult<Uuid> {
    form.parse::<Uuid>("restaurant_id", "Restaurant")?
        .ok_or_else(|| ApiError::BadRequest("Restaurant is required".to_string()))
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC)
fn parse_menu_date(form: &FormData) -> ApiResult<Option<DateTime<Utc>>> {
    let Some(raw) = form.text("date") else {
        return Ok(None);
    };
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| ApiError::BadRequest("Date is invalid".to_string()))
}

fn new_menu_from_form(form: &FormData, restaurant_id: Uuid) -> ApiResult<NewMenu> {
    let price = form
        .parse::<f64>("price", "Price")?
        .ok_or_else(|| ApiError::BadRequest("Price is required".to_string()))?;

    Ok(NewMenu {
        restaurant_id,
        menu_type: form.parse::<MenuType>("type", "Menu type")?.unwrap_or_default(),
        starter: form.text("starter").unwrap_or_default(),
        main: form.text("main").unwrap_or_default(),
        dessert: form.text("dessert"),
        price,
        photo_url: None,
        tags: form.list("tags").unwrap_or_default(),
        is_exclusive: form.flag("is_exclusive")?.unwrap_or(false),
        hours: form.text("hours"),
        date: parse_menu_date(form)?,
        includes_drink: form.flag("includes_drink")?.unwrap_or(false),
        drink_options: form.list("drink_options").unwrap_or_default(),
        additional_info: form.text("additional_info"),
    })
}

fn menu_changes_from_form(form: &FormData) -> ApiResult<UpdateMenu> {
    Ok(UpdateMenu {
        menu_type: form.parse::<MenuType>("type", "Menu type")?,
        starter: form.text("starter"),
        main: form.text("main"),
        dessert: form.text("dessert"),
        price: form.parse::<f64>("price", "Price")?,
        photo_url: None,
        tags: form.list("tags"),
        is_exclusive: form.flag("is_exclusive")?,
        hours: form.text("hours"),
        date: parse_menu_date(form)?,
        includes_drink: form.flag("includes_drink")?,
        drink_options: form.list("drink_options"),
        additional_info: form.text("additional_info"),
    })
}
