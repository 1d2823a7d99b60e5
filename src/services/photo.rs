use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;

use crate::capabilities::validate_photo_url;
use crate::error::ReviewsError;

/// Retrieves raw photo bytes for a URL. Fails with `BadUrl` when the URL
/// cannot be requested at all and `BadData` when the transfer fails.
#[async_trait]
pub trait PhotoFetcher: Send + Sync {
    async fn get_photo(&self, url: &str) -> Result<Bytes, ReviewsError>;
}

/// Serves photos from memory, keyed by URL.
#[derive(Clone, Debug, Default)]
pub struct StaticPhotoFetcher {
    photos: HashMap<String, Bytes>,
}

impl StaticPhotoFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, data: impl Into<Bytes>) {
        self.photos.insert(url.into(), data.into());
    }

    #[must_use]
    pub fn with_photo(mut self, url: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.insert(url, data);
        self
    }
}

#[async_trait]
impl PhotoFetcher for StaticPhotoFetcher {
    async fn get_photo(&self, url: &str) -> Result<Bytes, ReviewsError> {
        validate_photo_url(url)?;
        self.photos
            .get(url)
            .cloned()
            .ok_or_else(|| ReviewsError::BadData(format!("no photo at {url}")))
    }
}
