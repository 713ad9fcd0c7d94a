//! # Connection Settings
//!
//! Endpoints and providers carry a free-form settings mapping that is passed to
//! the remote desktop gateway. Forms edit it as YAML text.

use admin_framework::ValidationErrors;
use serde_json::{Map, Value};
use tracing::warn;

pub type Settings = Map<String, Value>;

/// YAML text for a settings mapping. An empty mapping renders as `{}`.
pub fn to_yaml(settings: &Settings) -> String {
    if settings.is_empty() {
        return "{}\n".to_string();
    }
    match serde_yaml::to_string(settings) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Settings could not be rendered as YAML");
            "{}\n".to_string()
        }
    }
}

/// Parses the settings text of `field`.
///
/// Blank text and YAML `null` are the empty mapping. Anything that is not a
/// mapping is a validation error on `field`.
pub fn from_yaml(field: &str, text: &str) -> Result<Settings, ValidationErrors> {
    if text.trim().is_empty() {
        return Ok(Settings::new());
    }
    let value: Value = serde_yaml::from_str(text)
        .map_err(|e| ValidationErrors::field(field, format!("Invalid YAML: {e}")))?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Settings::new()),
        _ => Err(ValidationErrors::field(
            field,
            "Settings must be a mapping of keys to values.",
        )),
    }
}
