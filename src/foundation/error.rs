/// Crate-wide result alias.
pub type InkResult<T> = Result<T, InkError>;

/// Errors surfaced by capture, normalization, persistence and playback.
#[derive(thiserror::Error, Debug)]
pub enum InkError {
    /// Input failed a structural check.
    #[error("validation error: {0}")]
    Validation(String),

    /// A variant was requested from a capture holding no points.
    #[error("empty capture: at least one stroke with one point is required")]
    EmptyCapture,

    /// Glyph box with a non-positive or non-finite extent.
    #[error("invalid glyph box: width {w} and height {h} must be finite and > 0")]
    InvalidGlyphBox {
        /// Offending width.
        w: f64,
        /// Offending height.
        h: f64,
    },

    /// Playback parameters or render surfaces are unusable.
    #[error("playback error: {0}")]
    Playback(String),

    /// JSON encode/decode failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Filesystem failure while importing or exporting.
    #[error("io error: {0}")]
    Io(String),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InkError {
    /// Build a [`InkError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`InkError::Playback`].
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Build a [`InkError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`InkError::Io`].
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
