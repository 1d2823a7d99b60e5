#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use image::{ExtendedColorType, ImageEncoder};
use reviews_core::{
    BundledReviewsProvider, ListSnapshot, PhotoFetcher, Review, ReviewsError, ReviewsProvider,
};
use tokio::sync::{watch, Semaphore};

pub fn review(index: usize, photo_urls: &[&str]) -> Review {
    Review {
        text: format!("Review number {index}."),
        created: "13 May 2024".into(),
        first_name: "Reviewer".into(),
        last_name: index.to_string(),
        rating: 5,
        photo_urls: if photo_urls.is_empty() {
            None
        } else {
            Some(photo_urls.iter().map(ToString::to_string).collect())
        },
    }
}

pub fn reviews(count: usize) -> Vec<Review> {
    (0..count).map(|i| review(i, &[])).collect()
}

pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut buffer = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buffer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .unwrap();
    buffer
}

/// Wraps a provider and counts calls. Each call waits for a permit when the
/// provider is gated.
pub struct CountingProvider {
    inner: BundledReviewsProvider,
    calls: AtomicUsize,
    gate: Option<Semaphore>,
}

impl CountingProvider {
    pub fn new(inner: BundledReviewsProvider) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn gated(inner: BundledReviewsProvider) -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new(inner)
        }
    }

    pub fn release(&self, responses: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(responses);
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReviewsProvider for CountingProvider {
    async fn get_reviews(&self, offset: usize) -> Result<Bytes, ReviewsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| ReviewsError::Network(e.to_string()))?
                .forget();
        }
        self.inner.get_reviews(offset).await
    }
}

/// Serves fixed responses per URL and records how often each was requested.
#[derive(Default)]
pub struct RecordingFetcher {
    responses: HashMap<String, Result<Bytes, ReviewsError>>,
    requests: Mutex<HashMap<String, usize>>,
}

impl RecordingFetcher {
    pub fn with(mut self, url: &str, response: Result<Bytes, ReviewsError>) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn requests(&self, url: &str) -> usize {
        self.requests.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl PhotoFetcher for RecordingFetcher {
    async fn get_photo(&self, url: &str) -> Result<Bytes, ReviewsError> {
        *self.requests.lock().unwrap().entry(url.to_string()).or_default() += 1;
        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(ReviewsError::BadData(format!("no photo at {url}"))))
    }
}

pub async fn wait_for(
    rx: &mut watch::Receiver<ListSnapshot>,
    predicate: impl FnMut(&ListSnapshot) -> bool,
) -> ListSnapshot {
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(predicate))
        .await
        .expect("timed out waiting for snapshot")
        .expect("controller stopped")
        .clone()
}

pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("timed out waiting for condition");
}
