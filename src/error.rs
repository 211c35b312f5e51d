//! Error types for editing operations.

use thiserror::Error;

use crate::model::AnnotationId;

/// Errors surfaced by the editing engine.
///
/// Everything here is recoverable: the session is left exactly as it was
/// before the failing call.
#[derive(Error, Debug)]
pub enum EditorError {
    /// An operation needs an image but none is loaded.
    #[error("No image loaded")]
    NoImage,

    /// Another decode is still pending; the request was ignored.
    #[error("Image is still loading, try again")]
    Busy,

    /// Image bytes could not be decoded.
    #[error("Failed to decode image: {source}")]
    Decode {
        /// Underlying codec error
        #[source]
        source: image::ImageError,
    },

    /// Image could not be encoded.
    #[error("Failed to encode image: {0}")]
    Encode(image::ImageError),

    /// No decode is pending.
    #[error("Nothing is loading")]
    NothingPending,

    /// Annotation id does not exist.
    #[error("Annotation not found: {0}")]
    UnknownAnnotation(AnnotationId),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading a font
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Font data could not be parsed.
    #[error("Invalid font: {0}")]
    Font(String),

    /// Configuration version is not supported.
    #[error("Unsupported config version {found} (expected {expected})")]
    ConfigVersion {
        /// Version this build understands
        expected: u32,
        /// Version found in the file
        found: u32,
    },
}

impl EditorError {
    /// Create a decode error.
    pub fn decode(source: image::ImageError) -> Self {
        Self::Decode { source }
    }

    /// Whether the message is meant to be shown to the user as-is.
    ///
    /// Configuration and font problems are for the integrator's logs.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::NoImage | Self::Busy | Self::Decode { .. } | Self::Encode(_)
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EditorError>;
