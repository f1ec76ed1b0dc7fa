/// Convenience result type used across slidecast.
pub type SlidecastResult<T> = Result<T, SlidecastError>;

/// Top-level error taxonomy used by the pipeline APIs.
///
/// Only structural failures travel through this type. Degradable gaps (missing visuals, silent
/// transitions, unknown style names) are logged and replaced with a fallback instead.
#[derive(thiserror::Error, Debug)]
pub enum SlidecastError {
    /// Invalid caller-provided data or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Zero or negative image/target dimensions.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// A primary section has no matching narration audio.
    #[error("missing audio: {0}")]
    MissingAudio(String),

    /// Image decode/encode failures from the `image` crate.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Failures while building clips or writing the final container.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Errors when serializing or deserializing config/job documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlidecastError {
    /// Build a [`SlidecastError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SlidecastError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`SlidecastError::MissingAudio`] value.
    pub fn missing_audio(msg: impl Into<String>) -> Self {
        Self::MissingAudio(msg.into())
    }

    /// Build a [`SlidecastError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`SlidecastError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for failures a single frame may absorb by falling back to its base image.
    pub(crate) fn is_frame_soft(&self) -> bool {
        matches!(self, Self::Geometry(_) | Self::Image(_))
    }
}

impl From<serde_json::Error> for SlidecastError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
