//! Error types for content conversion.

use thiserror::Error;

/// Errors surfaced by schema construction and by converter implementations.
///
/// Malformed content never produces an error: the rewrite engine removes
/// nodes it cannot interpret. Only converters (and invalid schema
/// definitions) fail.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Schema error at {path}: {message}")]
    SchemaError { path: String, message: String },

    #[error("Converter '{converter}' failed: {message}")]
    ConverterError { converter: String, message: String },
}

impl ConvertError {
    /// Shorthand for converter implementations reporting a failure.
    pub fn converter(converter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConverterError {
            converter: converter.into(),
            message: message.into(),
        }
    }

    pub(crate) fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaError {
            path: path.into(),
            message: message.into(),
        }
    }
}
