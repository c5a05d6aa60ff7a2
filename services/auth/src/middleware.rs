//! Middleware for JWT token validation and authentication

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::debug;

use crate::{error::AuthError, state::AppState};

/// Validate the bearer token and expose its claims to handlers
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Err(AuthError::Unauthorized(
            "Not authorized, no token".to_string(),
        ));
    };

    let claims = state.tokens.verify(bearer.token()).map_err(|e| {
        debug!("Rejected token: {}", e);
        AuthError::Unauthorized("Not authorized, token failed".to_string())
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
