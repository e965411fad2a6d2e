use thiserror::Error;

/// Top-level error type for Glimpse.
///
/// Subsystem crates either return this directly or define their own error
/// types with a `From` conversion so that `?` works across crate boundaries.
/// None of these messages are shown to the user; user-facing outcomes are
/// expressed as [`crate::types::Notice`] values instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GlimpseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image fetch error: {0}")]
    Fetch(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for GlimpseError {
    fn from(err: toml::de::Error) -> Self {
        GlimpseError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for GlimpseError {
    fn from(err: toml::ser::Error) -> Self {
        GlimpseError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for GlimpseError {
    fn from(err: serde_json::Error) -> Self {
        GlimpseError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Glimpse operations.
pub type Result<T> = std::result::Result<T, GlimpseError>;
