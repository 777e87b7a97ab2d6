// File: src/form_data.rs
// Purpose: Raw submitted form fields and uploaded files

use std::collections::HashMap;

/// A file received with a multipart form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }

    /// Browsers submit an empty part with no filename when nothing was chosen
    pub fn is_present(&self) -> bool {
        !self.filename.is_empty()
    }
}

/// Form data from POST requests.
///
/// Values are kept exactly as submitted; each flow normalizes the fields it
/// reads so it controls trimming and casing per field.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    /// Create empty form data
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from already-decoded fields
    pub fn from_fields(fields: HashMap<String, String>) -> Self {
        Self {
            fields,
            files: HashMap::new(),
        }
    }

    /// Parse an `application/x-www-form-urlencoded` body
    pub fn from_urlencoded(body: &str) -> Self {
        let fields = body
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect();

        Self::from_fields(fields)
    }

    /// Builder used by callers and tests to set a single field
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Attach an uploaded file under a field name
    pub fn with_file(mut self, key: impl Into<String>, file: UploadedFile) -> Self {
        self.files.insert(key.into(), file);
        self
    }

    /// Get a form field value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Field value, empty when the field was not submitted
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    /// Get a form field as a specific type
    pub fn get_as<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.fields.get(key)?.trim().parse().ok()
    }

    /// Checkbox semantics: present with any value other than an explicit false
    pub fn flag(&self, key: &str) -> bool {
        match self.get(key).map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) => !matches!(v.as_str(), "" | "false" | "0" | "off"),
            None => false,
        }
    }

    /// Check if a field exists
    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Uploaded file for a field, only if one was actually chosen
    pub fn file(&self, key: &str) -> Option<&UploadedFile> {
        self.files.get(key).filter(|file| file.is_present())
    }

    /// Get all field names
    pub fn keys(&self) -> Vec<&String> {
        self.fields.keys().collect()
    }

    /// Check if form is empty
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.files.is_empty()
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(spaced)
}
