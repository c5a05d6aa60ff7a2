//! Authentication service routes

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use common::jwt::Claims;
use domain::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, UserProfile};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::{
    error::{AuthError, AuthResult},
    middleware::auth_middleware,
    models::{NewUser, UpdateUser, User},
    password::{hash_password, verify_password, verify_unknown_account},
    state::AppState,
    validation::{normalize_email, validate_email, validate_name, validate_password},
};

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    let private = Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let users = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(private);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/users", users)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, AuthError>,
) -> AuthResult<(StatusCode, Json<AuthResponse>)> {
    validate_name(&payload.name).map_err(AuthError::BadRequest)?;
    let email = normalize_email(&payload.email);
    validate_email(&email).map_err(AuthError::BadRequest)?;
    validate_password(&payload.password).map_err(AuthError::BadRequest)?;
    let role = payload.requested_role()?;

    let password_hash = hash_password(&payload.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        AuthError::InternalServerError
    })?;

    let user = state
        .users
        .create(NewUser {
            name: payload.name.trim().to_string(),
            email,
            password_hash,
            role,
        })
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                AuthError::Conflict("User already exists".to_string())
            } else {
                AuthError::Database(e)
            }
        })?;

    info!("Registered user {} as {}", user.id, user.role);

    let token = issue_token(&state, &user)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new(user.into_profile(Vec::new()), token)),
    ))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, AuthError>,
) -> AuthResult<Json<AuthResponse>> {
    let email = normalize_email(&payload.email);

    if !state.rate_limiter.is_allowed(&email).await {
        warn!("Login rate limit hit for {}", email);
        return Err(AuthError::TooManyAttempts);
    }

    let Some(user) = state.users.find_by_email(&email).await? else {
        verify_unknown_account(&payload.password);
        return Err(AuthError::InvalidCredentials);
    };

    let matches = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!("Failed to verify password for {}: {}", user.id, e);
        AuthError::InternalServerError
    })?;
    if !matches {
        return Err(AuthError::InvalidCredentials);
    }

    state.rate_limiter.reset(&email).await;
    info!("User {} logged in", user.id);

    let favorites = state.users.favorites(user.id).await?;
    let token = issue_token(&state, &user)?;
    Ok(Json(AuthResponse::new(user.into_profile(favorites), token)))
}

/// Current user's profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AuthResult<Json<UserProfile>> {
    let user = find_user(&state, &claims).await?;
    let favorites = state.users.favorites(user.id).await?;
    Ok(Json(user.into_profile(favorites)))
}

/// Update the current user's profile and hand back a fresh token
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateProfileRequest>, AuthError>,
) -> AuthResult<Json<AuthResponse>> {
    payload.validate_name()?;

    let email = match payload.email.as_deref() {
        Some(raw) => {
            let email = normalize_email(raw);
            validate_email(&email).map_err(AuthError::BadRequest)?;
            Some(email)
        }
        None => None,
    };

    let password_hash = match payload.password.as_deref() {
        Some(password) => {
            validate_password(password).map_err(AuthError::BadRequest)?;
            Some(hash_password(password).map_err(|e| {
                error!("Failed to hash password: {}", e);
                AuthError::InternalServerError
            })?)
        }
        None => None,
    };

    let changes = UpdateUser {
        name: payload.name.map(|n| n.trim().to_string()),
        email,
        profile_picture: payload.profile_picture,
        password_hash,
    };

    let user = state
        .users
        .update(claims.sub, changes)
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                AuthError::Conflict("Email already in use".to_string())
            } else {
                AuthError::Database(e)
            }
        })?
        .ok_or_else(|| AuthError::NotFound("User not found".to_string()))?;

    info!("Updated profile of user {}", user.id);

    let favorites = state.users.favorites(user.id).await?;
    let token = issue_token(&state, &user)?;
    Ok(Json(AuthResponse::new(user.into_profile(favorites), token)))
}

async fn find_user(state: &AppState, claims: &Claims) -> AuthResult<User> {
    state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AuthError::NotFound("User not found".to_string()))
}

fn issue_token(state: &AppState, user: &User) -> AuthResult<String> {
    state.tokens.issue(user.id, user.role).map_err(|e| {
        error!("Failed to generate access token: {}", e);
        AuthError::InternalServerError
    })
}
