//! Resource service: restaurants, menus, reviews, favorites and photo uploads

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use common::jwt::TokenService;
use tokio::net::TcpListener;
use tracing::{info, warn};

mod authz;
mod error;
mod forms;
mod middleware;
mod ocr;
mod repositories;
mod routes;
mod settings;
mod state;
mod storage;
#[cfg(test)]
mod test_support;

use crate::{
    ocr::{ChatCompletionClient, GoogleVisionDetector, MenuPhotoParser},
    repositories::{PgMenuStore, PgRestaurantStore, PgReviewStore, PgUserStore},
    settings::{ApiSettings, OcrSettings},
    state::{AppState, Stores},
};

#[tokio::main]
async fn main() -> Result<()> {
    common::telemetry::init_tracing("api-service")?;

    info!("Starting API service");

    let settings = ApiSettings::load()?;
    let pool = common::database::connect(&settings.database).await?;
    let tokens = TokenService::new(&settings.jwt)?;
    let menu_parser = menu_parser(&settings.ocr)?;

    let stores = Stores {
        restaurants: Arc::new(PgRestaurantStore::new(pool.clone())),
        menus: Arc::new(PgMenuStore::new(pool.clone())),
        reviews: Arc::new(PgReviewStore::new(pool.clone())),
        users: Arc::new(PgUserStore::new(pool.clone())),
    };
    let app_state = AppState::new(stores, tokens, menu_parser, settings.uploads.clone())
        .with_pool(pool);

    info!("API service initialized successfully");

    let app = routes::create_router(app_state);

    let address = settings.server.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(common::shutdown::signal())
        .await?;

    Ok(())
}

/// Build the outbound OCR clients once; handlers share them through the state
fn menu_parser(settings: &OcrSettings) -> Result<MenuPhotoParser> {
    if settings.vision_api_key.is_empty() || settings.completion_api_key.is_empty() {
        warn!("OCR API keys are not configured; menu photo parsing will fail upstream");
    }

    let timeout = Duration::from_secs(settings.timeout_seconds);
    let detector = GoogleVisionDetector::new(
        settings.vision_endpoint.clone(),
        settings.vision_api_key.clone(),
        timeout,
    )?;
    let completer = ChatCompletionClient::new(
        settings.completion_endpoint.clone(),
        settings.completion_api_key.clone(),
        settings.model.clone(),
        timeout,
    )?;

    Ok(MenuPhotoParser::new(Arc::new(detector), Arc::new(completer)))
}
