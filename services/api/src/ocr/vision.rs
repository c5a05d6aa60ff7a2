//! Google Cloud Vision `images:annotate` adapter

use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{OcrError, TextDetector};

const SERVICE: &str = "text detection";

/// Text detector backed by the Vision REST API
pub struct GoogleVisionDetector {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GoogleVisionDetector {
    pub fn new(endpoint: String, api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    requests: [AnnotateImageRequest<'a>; 1],
}

#[derive(Serialize)]
struct AnnotateImageRequest<'a> {
    image: ImageContent,
    features: [Feature<'a>; 1],
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageAnnotations>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageAnnotations {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
}

fn annotate_request(image: &[u8]) -> AnnotateRequest<'static> {
    AnnotateRequest {
        requests: [AnnotateImageRequest {
            image: ImageContent {
                content: STANDARD.encode(image),
            },
            features: [Feature {
                kind: "TEXT_DETECTION",
            }],
        }],
    }
}

/// First annotation holds the full page text
fn page_text(body: &[u8]) -> Result<String, OcrError> {
    let decoded: AnnotateResponse = serde_json::from_slice(body)
        .map_err(|e| OcrError::InvalidOutput(format!("invalid text detection payload: {e}")))?;

    decoded
        .responses
        .into_iter()
        .next()
        .and_then(|r| r.text_annotations.into_iter().next())
        .map(|a| a.description)
        .filter(|text| !text.trim().is_empty())
        .ok_or(OcrError::NoTextDetected)
}

#[async_trait]
impl TextDetector for GoogleVisionDetector {
    async fn detect_text(&self, image: &[u8]) -> Result<String, OcrError> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&annotate_request(image))
            .send()
            .await
            .map_err(|source| OcrError::Transport {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|source| OcrError::Transport {
            service: SERVICE,
            source,
        })?;
        if !status.is_success() {
            return Err(OcrError::UpstreamStatus {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        let text = page_text(&body)?;
        debug!("Detected {} characters of menu text", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_base64_image_and_feature() {
        let json = serde_json::to_value(annotate_request(b"img")).unwrap();
        assert_eq!(json["requests"][0]["image"]["content"], "aW1n");
        assert_eq!(json["requests"][0]["features"][0]["type"], "TEXT_DETECTION");
    }

    #[test]
    fn first_annotation_is_the_page_text() {
        let body = br#"{"responses":[{"textAnnotations":[
            {"description":"MENU DEL DIA\nGazpacho\nPaella\n12,50"},
            {"description":"MENU"}
        ]}]}"#;
        assert_eq!(
            page_text(body).unwrap(),
            "MENU DEL DIA\nGazpacho\nPaella\n12,50"
        );
    }

    #[test]
    fn missing_or_blank_annotations_mean_no_text() {
        for body in [
            br#"{"responses":[{}]}"#.as_slice(),
            br#"{"responses":[]}"#.as_slice(),
            br#"{"responses":[{"textAnnotations":[{"description":"   "}]}]}"#.as_slice(),
        ] {
            assert!(matches!(page_text(body), Err(OcrError::NoTextDetected)));
        }
    }
}
