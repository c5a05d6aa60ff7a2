//! Photo-to-menu pipeline and validation of model output

use std::sync::Arc;

use domain::ParsedMenu;
use serde_json::{Map, Value};
use tracing::info;

use super::{MenuCompleter, OcrError, TextDetector};

/// Runs text detection then menu completion on a photo
#[derive(Clone)]
pub struct MenuPhotoParser {
    detector: Arc<dyn TextDetector>,
    completer: Arc<dyn MenuCompleter>,
}

impl MenuPhotoParser {
    pub fn new(detector: Arc<dyn TextDetector>, completer: Arc<dyn MenuCompleter>) -> Self {
        Self {
            detector,
            completer,
        }
    }

    pub async fn parse(&self, image: &[u8]) -> Result<ParsedMenu, OcrError> {
        let text = self.detector.detect_text(image).await?;
        let raw = self.completer.complete_menu(&text).await?;
        let menu = parse_model_output(&raw)?;
        info!("Parsed menu photo into '{}' / '{}'", menu.starter, menu.main);
        Ok(menu)
    }
}

/// Validate an untrusted model answer as a menu
pub fn parse_model_output(raw: &str) -> Result<ParsedMenu, OcrError> {
    let body = strip_code_fence(raw);
    let value: Value = serde_json::from_str(body)
        .map_err(|e| OcrError::InvalidOutput(format!("not JSON: {e}")))?;
    let Value::Object(object) = value else {
        return Err(invalid("expected a JSON object"));
    };

    Ok(ParsedMenu {
        starter: required_text(&object, "starter")?,
        main: required_text(&object, "main")?,
        dessert: optional_text(&object, "dessert")?,
        price: price(&object)?,
        tags: tags(&object)?,
    })
}

fn invalid(message: impl Into<String>) -> OcrError {
    OcrError::InvalidOutput(message.into())
}

/// Drop a surrounding ```json ... ``` fence if the model added one
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    match rest.split_once('\n') {
        Some((lang, body)) if !lang.trim_start().starts_with('{') => body.trim(),
        _ => rest.trim(),
    }
}

fn required_text(object: &Map<String, Value>, key: &str) -> Result<String, OcrError> {
    match object.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(invalid(format!("'{key}' must be a non-empty string"))),
    }
}

fn optional_text(object: &Map<String, Value>, key: &str) -> Result<Option<String>, OcrError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(_) => Err(invalid(format!("'{key}' must be a string"))),
    }
}

fn price(object: &Map<String, Value>) -> Result<f64, OcrError> {
    let price = match object.get("price") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => numeric_prefix(s),
        _ => None,
    }
    .ok_or_else(|| invalid("'price' must be a number"))?;

    if !price.is_finite() || price < 0.0 {
        return Err(invalid("'price' must be a non-negative number"));
    }
    Ok(price)
}

/// Read "12,50 €" or "€12.50" as 12.5
fn numeric_prefix(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    digits.parse().ok()
}

fn tags(object: &Map<String, Value>) -> Result<Vec<String>, OcrError> {
    match object.get("tags") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.trim().to_string()),
                _ => Err(invalid("'tags' must only contain strings")),
            })
            .filter(|tag| !matches!(tag, Ok(t) if t.is_empty()))
            .collect(),
        Some(_) => Err(invalid("'tags' must be a list of strings")),
    }
}
