//! Error type shared by every tool.
//!
//! Tools validate synchronously and bail out with a `ToolError`; the wasm
//! bindings turn it into a plain JS error string for the page to display.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum ToolError {
    /// User input failed validation (empty, out of range, malformed).
    #[error("{0}")]
    InvalidInput(String),

    /// Requested mode/format/unit is not one the tool knows.
    #[error("unsupported {0}")]
    Unsupported(String),

    #[error("image error: {0}")]
    Image(String),

    /// Transport failure or an error payload from a remote API.
    #[error("network error: {0}")]
    Network(String),

    /// A payload could not be decoded (JSON, base64, ...).
    #[error("decode error: {0}")]
    Decode(String),

    #[error("randomness unavailable: {0}")]
    Random(String),
}

impl ToolError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<image::ImageError> for ToolError {
    fn from(err: image::ImageError) -> Self {
        Self::Image(err.to_string())
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<ToolError> for JsValue {
    fn from(err: ToolError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T, E = ToolError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_displays_bare_message() {
        let err = ToolError::invalid("value is empty");
        assert_eq!(err.to_string(), "value is empty");
    }

    #[test]
    fn unsupported_prefixes_message() {
        let err = ToolError::unsupported("unit: furlong");
        assert_eq!(err.to_string(), "unsupported unit: furlong");
    }

    #[test]
    fn json_errors_become_decode_errors() {
        let err: ToolError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ToolError::Decode(_)));
    }
}
