//! Multipart form collection
//!
//! Forms mix text fields with image files. Text fields may repeat, may use
//! the `key[]` spelling for lists, and a single list value is split on
//! commas. Files are checked for type and size while they are read.

use std::{collections::HashMap, str::FromStr};

use axum::{body::Bytes, extract::Multipart};

use crate::error::ApiError;

/// Image types accepted for every upload
const ALLOWED_EXTENSIONS: [&str; 4] = ["jpeg", "jpg", "png", "webp"];

/// Limits applied to the files of one form
#[derive(Debug, Clone, Copy)]
pub struct FileRules {
    pub max_bytes: usize,
    pub max_files: usize,
}

/// An image read from a multipart field
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    /// Lower-cased extension of the original file name
    pub extension: String,
    pub bytes: Bytes,
}

/// Text fields and files of a multipart body
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, Vec<String>>,
    files: HashMap<String, Vec<UploadedFile>>,
}

fn field_key(name: &str) -> String {
    name.strip_suffix("[]").unwrap_or(name).to_string()
}

/// Accept a file only when both its content type and its extension are images
fn image_extension(file_name: &str, content_type: &str) -> Result<String, ApiError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    let subtype = content_type
        .strip_prefix("image/")
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str())
        && ALLOWED_EXTENSIONS.contains(&subtype.as_str())
    {
        Ok(extension)
    } else {
        Err(ApiError::BadRequest(
            "Only image files (jpeg, jpg, png, webp) are allowed".to_string(),
        ))
    }
}

impl FormData {
    /// Read every field of the body, validating files against `rules`
    pub async fn collect(mut multipart: Multipart, rules: FileRules) -> Result<Self, ApiError> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(field_key) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().unwrap_or_default().to_string();
                    let extension = image_extension(&file_name, &content_type)?;
                    let bytes = field.bytes().await?;
                    if bytes.len() > rules.max_bytes {
                        return Err(ApiError::BadRequest(format!(
                            "File too large, the limit is {} MB",
                            rules.max_bytes / (1024 * 1024)
                        )));
                    }

                    let files = form.files.entry(name).or_default();
                    if files.len() >= rules.max_files {
                        return Err(ApiError::BadRequest(format!(
                            "Too many files, at most {} allowed",
                            rules.max_files
                        )));
                    }
                    files.push(UploadedFile {
                        file_name,
                        content_type,
                        extension,
                        bytes,
                    });
                }
                None => {
                    let value = field.text().await?;
                    form.fields.entry(name).or_default().push(value);
                }
            }
        }

        Ok(form)
    }

    /// First value of a text field, trimmed; blank counts as absent
    pub fn text(&self, key: &str) -> Option<String> {
        self.fields
            .get(key)
            .and_then(|values| values.first())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// List field; `None` when the key never appeared
    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        let values = self.fields.get(key)?;
        let list = match values.as_slice() {
            [single] => domain::menu::split_comma_list(single),
            many => many
                .iter()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect(),
        };
        Some(list)
    }

    /// Parse a text field, reporting failures as `"<label> is invalid"`
    pub fn parse<T: FromStr>(&self, key: &str, label: &str) -> Result<Option<T>, ApiError> {
        self.text(key)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|_| ApiError::BadRequest(format!("{label} is invalid")))
            })
            .transpose()
    }

    /// Boolean field accepting `true`/`false` (HTML checkboxes send `on`)
    pub fn flag(&self, key: &str) -> Result<Option<bool>, ApiError> {
        match self.text(key).as_deref() {
            None => Ok(None),
            Some("true") | Some("on") | Some("1") => Ok(Some(true)),
            Some("false") | Some("off") | Some("0") => Ok(Some(false)),
            Some(_) => Err(ApiError::BadRequest(format!("{key} must be true or false"))),
        }
    }

    pub fn take_file(&mut self, key: &str) -> Option<UploadedFile> {
        self.files
            .get_mut(key)
            .filter(|files| !files.is_empty())
            .map(|files| files.remove(0))
    }

    pub fn take_files(&mut self, key: &str) -> Vec<UploadedFile> {
        self.files.remove(key).unwrap_or_default()
    }

    #[cfg(test)]
    pub fn with_fields(pairs: &[(&str, &str)]) -> Self {
        let mut form = FormData::default();
        for (key, value) in pairs {
            form.fields
                .entry(field_key(key))
                .or_default()
                .push(value.to_string());
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_fields_accept_all_spellings() {
        let repeated = FormData::with_fields(&[("tags[]", "vegan"), ("tags[]", " seafood ")]);
        assert_eq!(
            repeated.list("tags"),
            Some(vec!["vegan".to_string(), "seafood".to_string()])
        );

        let comma = FormData::with_fields(&[("tags", "vegan, seafood")]);
        assert_eq!(comma.list("tags"), repeated.list("tags"));

        let empty = FormData::with_fields(&[("tags", "")]);
        assert_eq!(empty.list("tags"), Some(vec![]));
        assert_eq!(empty.list("drink_options"), None);
    }

    #[test]
    fn text_and_parse() {
        let form = FormData::with_fields(&[("price", " 12.5 "), ("rating", "five"), ("comment", "  ")]);
        assert_eq!(form.parse::<f64>("price", "Price").unwrap(), Some(12.5));
        assert!(form.parse::<i16>("rating", "Rating").is_err());
        assert_eq!(form.text("comment"), None);
        assert_eq!(form.parse::<i16>("missing", "Missing").unwrap(), None);
    }

    #[test]
    fn flags() {
        let form = FormData::with_fields(&[("a", "true"), ("b", "false"), ("c", "maybe")]);
        assert_eq!(form.flag("a").unwrap(), Some(true));
        assert_eq!(form.flag("b").unwrap(), Some(false));
        assert!(form.flag("c").is_err());
        assert_eq!(form.flag("d").unwrap(), None);
    }

    #[test]
    fn image_type_needs_matching_mime_and_extension() {
        assert_eq!(image_extension("menu.JPG", "image/jpeg").unwrap(), "jpg");
        assert_eq!(image_extension("menu.webp", "image/webp").unwrap(), "webp");
        assert!(image_extension("menu.gif", "image/gif").is_err());
        assert!(image_extension("menu.png", "application/pdf").is_err());
        assert!(image_extension("menu", "image/png").is_err());
    }
}
