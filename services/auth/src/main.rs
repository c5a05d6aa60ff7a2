//! Identity service: registration, login and profile management

use std::sync::Arc;

use anyhow::Result;
use common::jwt::TokenService;
use tokio::net::TcpListener;
use tracing::info;

mod error;
mod middleware;
mod models;
mod password;
mod rate_limiter;
mod repositories;
mod routes;
mod settings;
mod state;
#[cfg(test)]
mod test_support;
mod validation;

use crate::{
    rate_limiter::RateLimiter, repositories::PgUserStore, settings::AuthSettings, state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    common::telemetry::init_tracing("auth-service")?;

    info!("Starting authentication service");

    let settings = AuthSettings::load()?;
    let pool = common::database::connect(&settings.database).await?;
    let tokens = TokenService::new(&settings.jwt)?;

    let app_state = AppState::new(
        Arc::new(PgUserStore::new(pool)),
        tokens,
        RateLimiter::new(settings.rate_limit.clone()),
    );

    info!("Authentication service initialized successfully");

    let app = routes::create_router(app_state);

    let address = settings.server.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Authentication service listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(common::shutdown::signal())
        .await?;

    Ok(())
}
