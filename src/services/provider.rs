use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use rand::Rng;
use tracing::{debug, instrument};

use crate::error::ReviewsError;
use crate::model::{Review, ReviewsPage};

/// Reviews response shipped with the crate, for demos and shells without a
/// backend.
pub const BUNDLED_REVIEWS: &[u8] = include_bytes!("../../resources/reviews.json");

/// Source of review pages. The payload decodes to [`ReviewsPage`].
#[async_trait]
pub trait ReviewsProvider: Send + Sync {
    async fn get_reviews(&self, offset: usize) -> Result<Bytes, ReviewsError>;
}

/// Serves pages out of one in-memory reviews document.
#[derive(Clone, Debug)]
pub struct BundledReviewsProvider {
    reviews: Vec<Review>,
    count: usize,
    page_size: usize,
    latency_ms: Option<(u64, u64)>,
}

impl BundledReviewsProvider {
    pub fn from_json(raw: &[u8], page_size: usize) -> Result<Self, ReviewsError> {
        let document: ReviewsPage = serde_json::from_slice(raw)?;
        Ok(Self::new(document.items, document.count, page_size))
    }

    pub fn embedded(page_size: usize) -> Result<Self, ReviewsError> {
        Self::from_json(BUNDLED_REVIEWS, page_size)
    }

    pub fn new(reviews: Vec<Review>, count: usize, page_size: usize) -> Self {
        Self {
            reviews,
            count,
            page_size,
            latency_ms: None,
        }
    }

    /// Delays each response by a random duration in `min..=max`.
    #[must_use]
    pub fn with_latency(mut self, min: Duration, max: Duration) -> Self {
        let min_ms = u64::try_from(min.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
        self.latency_ms = Some((min_ms.min(max_ms), min_ms.max(max_ms)));
        self
    }

    pub fn page(&self, offset: usize) -> ReviewsPage {
        let start = offset.min(self.reviews.len());
        let end = offset.saturating_add(self.page_size).min(self.reviews.len());
        ReviewsPage {
            items: self.reviews[start..end].to_vec(),
            count: self.count,
        }
    }

    fn sample_latency(&self) -> Option<Duration> {
        self.latency_ms
            .map(|(min, max)| Duration::from_millis(rand::thread_rng().gen_range(min..=max)))
    }
}

#[async_trait]
impl ReviewsProvider for BundledReviewsProvider {
    #[instrument(skip(self))]
    async fn get_reviews(&self, offset: usize) -> Result<Bytes, ReviewsError> {
        if let Some(delay) = self.sample_latency() {
            tokio::time::sleep(delay).await;
        }

        let page = self.page(offset);
        debug!(returned = page.items.len(), total = page.count, "serving bundled page");
        Ok(Bytes::from(serde_json::to_vec(&page)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_document_parses() {
        let provider = BundledReviewsProvider::embedded(20).unwrap();
        let page = provider.page(0);
        assert!(!page.items.is_empty());
        assert_eq!(page.count, provider.reviews.len());
    }

    #[test]
    fn slices_by_offset_and_page_size() {
        let provider = BundledReviewsProvider::embedded(5).unwrap();
        let total = provider.reviews.len();

        assert_eq!(provider.page(0).items.len(), 5.min(total));
        assert_eq!(provider.page(5).items[0], provider.reviews[5]);
        assert!(provider.page(total).items.is_empty());
        assert!(provider.page(usize::MAX).items.is_empty());
    }

    #[test]
    fn rejects_malformed_document() {
        assert!(matches!(
            BundledReviewsProvider::from_json(b"[]", 10),
            Err(ReviewsError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn payload_round_trips_through_page_decoding() {
        let provider = BundledReviewsProvider::embedded(4).unwrap();
        let bytes = provider.get_reviews(4).await.unwrap();
        let page = crate::app::decode_page(&bytes).unwrap();
        assert_eq!(page, provider.page(4));
    }

    #[tokio::test]
    async fn latency_delays_the_response() {
        let provider = BundledReviewsProvider::embedded(4)
            .unwrap()
            .with_latency(Duration::from_millis(30), Duration::from_millis(30));
        let started = tokio::time::Instant::now();
        provider.get_reviews(0).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
