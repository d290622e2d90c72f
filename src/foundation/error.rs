/// Convenience result type used across postcomp.
pub type PostcompResult<T> = Result<T, PostcompError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only caller-visible failures live here. Recoverable asset problems (a background or logo that
/// cannot be fetched) are handled inside the compositor and never surface as an error.
#[derive(thiserror::Error, Debug)]
pub enum PostcompError {
    /// Unknown output format tag.
    #[error("invalid format: '{0}' (expected square, story or landscape)")]
    InvalidFormat(String),

    /// Unknown anchor token.
    #[error("invalid anchor: '{0}'")]
    InvalidAnchor(String),

    /// Invalid user-provided request or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while fetching or decoding an asset.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Errors while painting or exporting a surface.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PostcompError {
    /// Build a [`PostcompError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PostcompError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build a [`PostcompError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PostcompError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for the errors that indicate a programming mistake in the caller (bad format or
    /// anchor tokens) rather than bad data.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidFormat(_) | Self::InvalidAnchor(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
