//! Bearer authentication for private routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::{debug, warn};

use crate::{error::ApiError, state::AppState};

/// Verify the token, then load the caller's current role so a promotion
/// takes effect without logging in again
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Err(ApiError::Unauthorized(
            "Not authorized, no token".to_string(),
        ));
    };

    let claims = state.tokens.verify(bearer.token()).map_err(|e| {
        debug!("Rejected token: {}", e);
        ApiError::Unauthorized("Not authorized, token failed".to_string())
    })?;

    let principal = state.users.principal(claims.sub).await?.ok_or_else(|| {
        warn!("Token subject {} no longer exists", claims.sub);
        ApiError::Unauthorized("Not authorized, user not found".to_string())
    })?;

    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}
