//! Shared handler state

use std::sync::Arc;

use common::jwt::TokenService;

use crate::{rate_limiter::RateLimiter, repositories::UserStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub tokens: TokenService,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService, rate_limiter: RateLimiter) -> Self {
        Self {
            users,
            tokens,
            rate_limiter,
        }
    }
}
