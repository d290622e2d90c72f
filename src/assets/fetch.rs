use std::{path::PathBuf, sync::Arc, time::Duration};

use base64::Engine as _;

use crate::{
    assets::decode::{LoadedAsset, decode_asset},
    foundation::error::{PostcompError, PostcompResult},
};

/// Where a background or logo image comes from.
///
/// Serialized as a single string: `http(s)://` URLs, `file://` URIs or plain paths, and inline
/// `data:<mime>;base64,<payload>` URIs. In-memory bytes serialize back to a data URI.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImageSource {
    Url(String),
    Path(PathBuf),
    Bytes(Arc<Vec<u8>>),
}

impl ImageSource {
    pub fn parse(source: &str) -> PostcompResult<Self> {
        let source = source.trim();
        if source.is_empty() {
            return Err(PostcompError::validation("image source must be non-empty"));
        }

        if source.starts_with("http://") || source.starts_with("https://") {
            return Ok(Self::Url(source.to_owned()));
        }
        if let Some(path) = source.strip_prefix("file://") {
            if path.is_empty() {
                return Err(PostcompError::validation("file:// source has no path"));
            }
            return Ok(Self::Path(PathBuf::from(path)));
        }
        if let Some(rest) = source.strip_prefix("data:") {
            let (_, payload) = rest.split_once(";base64,").ok_or_else(|| {
                PostcompError::validation("data: sources must be base64 encoded")
            })?;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(payload)
                .map_err(|e| PostcompError::validation(format!("invalid base64 data uri: {e}")))?;
            return Ok(Self::Bytes(Arc::new(bytes)));
        }
        if source.contains("://") {
            return Err(PostcompError::validation(format!(
                "unsupported image source scheme: '{source}'"
            )));
        }
        Ok(Self::Path(PathBuf::from(source)))
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(Arc::new(bytes.into()))
    }

    /// Short human-readable label for logs (never the full payload of inline bytes).
    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Path(path) => path.display().to_string(),
            Self::Bytes(bytes) => format!("<{} inline bytes>", bytes.len()),
        }
    }
}

impl std::str::FromStr for ImageSource {
    type Err = PostcompError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ImageSource {
    type Error = PostcompError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ImageSource> for String {
    fn from(value: ImageSource) -> Self {
        match value {
            ImageSource::Url(url) => url,
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Bytes(bytes) => format!(
                "data:application/octet-stream;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(bytes.as_slice())
            ),
        }
    }
}

/// Settings for [`AssetFetcher`].
#[derive(Clone, Debug)]
pub struct FetchConfig {
    /// Whole-request timeout for remote sources.
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
        }
    }
}

/// Loads image bytes from any [`ImageSource`] and decodes them.
///
/// Nothing is cached: every render fetches its own assets so output depends only on the
/// sources at render time.
#[derive(Clone, Debug)]
pub struct AssetFetcher {
    http_client: reqwest::Client,
}

impl AssetFetcher {
    pub fn new(config: FetchConfig) -> PostcompResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PostcompError::fetch(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { http_client })
    }

    /// Fetch raw bytes for `source`.
    pub async fn fetch_bytes(&self, source: &ImageSource) -> PostcompResult<Arc<Vec<u8>>> {
        match source {
            ImageSource::Url(url) => self.fetch_from_http(url).await.map(Arc::new),
            ImageSource::Path(path) => tokio::fs::read(path)
                .await
                .map(Arc::new)
                .map_err(|e| PostcompError::fetch(format!("read '{}': {e}", path.display()))),
            ImageSource::Bytes(bytes) => Ok(bytes.clone()),
        }
    }

    /// Fetch and decode `source`.
    #[tracing::instrument(level = "debug", skip(self), fields(source = %source.describe()))]
    pub async fn fetch(&self, source: &ImageSource) -> PostcompResult<LoadedAsset> {
        let bytes = self.fetch_bytes(source).await?;
        decode_asset(&bytes).map_err(|e| {
            PostcompError::fetch(format!("decode '{}': {e:#}", source.describe()))
        })
    }

    async fn fetch_from_http(&self, url: &str) -> PostcompResult<Vec<u8>> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| PostcompError::fetch(format!("GET {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(PostcompError::fetch(format!(
                "GET {url} returned status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PostcompError::fetch(format!("failed to read body of {url}: {e}")))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
