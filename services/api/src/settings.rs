//! API service configuration

use std::path::PathBuf;

use common::{database::DatabaseConfig, jwt::JwtConfig, settings::ServerConfig};
use config::ConfigError;
use serde::Deserialize;

pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";
pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Settings read from `config/api.toml` and `API__*` variables
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub uploads: UploadSettings,
    pub ocr: OcrSettings,
}

/// Where photos are written and how large they may be
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    pub root: PathBuf,
    pub max_menu_photo_bytes: usize,
    pub max_photo_bytes: usize,
    pub max_review_photos: usize,
}

/// Text detection and menu completion endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct OcrSettings {
    pub vision_endpoint: String,
    pub vision_api_key: String,
    pub completion_endpoint: String,
    pub completion_api_key: String,
    pub model: String,
    pub timeout_seconds: u64,
}

impl ApiSettings {
    pub fn load() -> Result<Self, ConfigError> {
        let builder = common::settings::layered("api", "API")
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001)?
            .set_default("uploads.root", "uploads")?
            .set_default("uploads.max_menu_photo_bytes", 10 * 1024 * 1024)?
            .set_default("uploads.max_photo_bytes", 5 * 1024 * 1024)?
            .set_default("uploads.max_review_photos", 5)?
            .set_default("ocr.vision_endpoint", DEFAULT_VISION_ENDPOINT)?
            .set_default("ocr.vision_api_key", "")?
            .set_default("ocr.completion_endpoint", DEFAULT_COMPLETION_ENDPOINT)?
            .set_default("ocr.completion_api_key", "")?
            .set_default("ocr.model", "gpt-4")?
            .set_default("ocr.timeout_seconds", 60)?;
        common::settings::finish(builder)
    }
}
