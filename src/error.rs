use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Decode,
    BadUrl,
    BadData,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Decode => "DECODE_ERROR",
            Self::BadUrl => "BAD_URL",
            Self::BadData => "BAD_DATA",
        }
    }

    /// Transport failures may succeed on the next attempt; the others are
    /// properties of the payload or URL itself.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Network)
    }
}

/// Failures at the provider and photo fetcher boundary.
///
/// None of these are fatal: pagination failures leave the list unchanged and
/// re-arm loading, photo failures are dropped per URL.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ReviewsError {
    #[error("network error: {0}")]
    Network(String),

    #[error("failed to decode reviews payload: {0}")]
    Decode(String),

    #[error("invalid photo url '{url}': {reason}")]
    BadUrl { url: String, reason: String },

    #[error("bad photo data: {0}")]
    BadData(String),
}

impl ReviewsError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::Decode(_) => ErrorKind::Decode,
            Self::BadUrl { .. } => ErrorKind::BadUrl,
            Self::BadData(_) => ErrorKind::BadData,
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind().code()
    }

    pub fn bad_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BadUrl {
            url: truncate(url.into()),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ReviewsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<image::ImageError> for ReviewsError {
    fn from(e: image::ImageError) -> Self {
        Self::BadData(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

fn truncate(url: String) -> String {
    const MAX: usize = 100;
    match url.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &url[..idx]),
        None => url,
    }
}
