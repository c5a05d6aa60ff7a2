//! Menu photo parsing
//!
//! A photographed menu goes through two outbound calls: a text detector
//! turns the image into raw text, then a chat-completion model turns that
//! text into a [`domain::ParsedMenu`]. Both calls sit behind traits so the
//! pipeline can be exercised without network access.

pub mod completion;
pub mod parser;
pub mod vision;

use async_trait::async_trait;
use thiserror::Error;

pub use completion::ChatCompletionClient;
pub use parser::MenuPhotoParser;
pub use vision::GoogleVisionDetector;

/// Failures of the photo parsing pipeline
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("No text detected in the image")]
    NoTextDetected,

    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} answered with status {status}")]
    UpstreamStatus { service: &'static str, status: u16 },

    /// The model answer is not a usable menu
    #[error("Invalid menu completion output: {0}")]
    InvalidOutput(String),
}

/// Extracts the full text of an image
#[async_trait]
pub trait TextDetector: Send + Sync {
    async fn detect_text(&self, image: &[u8]) -> Result<String, OcrError>;
}

/// Asks a language model to structure raw menu text
#[async_trait]
pub trait MenuCompleter: Send + Sync {
    /// Returns the model's raw answer, expected to be a JSON object
    async fn complete_menu(&self, text: &str) -> Result<String, OcrError>;
}
