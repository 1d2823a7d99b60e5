mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use common::{create_test_png, review, reviews, wait_for, wait_until, CountingProvider, RecordingFetcher};
use reviews_core::{
    BundledReviewsProvider, FixedWidthMeasurer, ReviewsConfig, ReviewsController,
    ReviewsError, ReviewsProvider, RowItem, ScrollGeometry, Services, StaticPhotoFetcher,
};

fn config(page_size: usize) -> ReviewsConfig {
    ReviewsConfig {
        page_size,
        ..ReviewsConfig::default()
    }
}

fn no_photos() -> Arc<StaticPhotoFetcher> {
    Arc::new(StaticPhotoFetcher::new())
}

#[tokio::test]
async fn paginates_until_count_row() {
    let provider = Arc::new(CountingProvider::new(BundledReviewsProvider::new(reviews(25), 25, 10)));
    let controller = ReviewsController::spawn(Services::new(provider.clone(), no_photos()), config(10));
    let mut rx = controller.subscribe();

    // 1. Two full pages
    for expected in [10, 20] {
        controller.load_more();
        let snapshot = wait_for(&mut rx, |s| s.len() == expected).await;
        assert!(snapshot.should_load);
        assert!(!snapshot.is_exhausted);
    }

    // 2. Short last page closes pagination
    controller.load_more();
    let snapshot = wait_for(&mut rx, |s| s.is_exhausted).await;
    assert_eq!(snapshot.len(), 26);
    assert_eq!(snapshot.offset, 30);
    assert!(!snapshot.should_load);
    match snapshot.items.last() {
        Some(RowItem::Count(row)) => assert_eq!(row.label().as_str(), "25 reviews"),
        other => panic!("expected count row, got {other:?}"),
    }

    // 3. Further requests never reach the provider
    controller.load_more();
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(provider.calls(), 3);
    assert_eq!(controller.snapshot().len(), 26);
}

#[tokio::test]
async fn repeated_load_requests_issue_one_fetch() {
    let provider = Arc::new(CountingProvider::gated(BundledReviewsProvider::new(reviews(40), 40, 10)));
    let controller = ReviewsController::spawn(Services::new(provider.clone(), no_photos()), config(10));
    let mut rx = controller.subscribe();

    controller.load_more();
    controller.load_more();
    controller.on_scroll(ScrollGeometry {
        viewport_height: 800.0,
        content_height: 800.0,
        target_offset: 0.0,
    });

    wait_until(|| provider.calls() == 1).await;
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(provider.calls(), 1);

    provider.release(1);
    let snapshot = wait_for(&mut rx, |s| s.len() == 10).await;
    assert_eq!(snapshot.offset, 10);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn scroll_near_bottom_loads_next_page() {
    let provider = Arc::new(CountingProvider::new(BundledReviewsProvider::new(reviews(40), 40, 10)));
    let controller = ReviewsController::spawn(Services::new(provider.clone(), no_photos()), config(10));
    let mut rx = controller.subscribe();

    controller.load_more();
    wait_for(&mut rx, |s| s.len() == 10).await;

    // Far from the bottom: 5000 - 800 - 0 = 4200 > 2000
    controller.on_scroll(ScrollGeometry {
        viewport_height: 800.0,
        content_height: 5000.0,
        target_offset: 0.0,
    });
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(provider.calls(), 1);

    // 5000 - 800 - 2500 = 1700 <= 2000
    controller.on_scroll(ScrollGeometry {
        viewport_height: 800.0,
        content_height: 5000.0,
        target_offset: 2500.0,
    });
    wait_for(&mut rx, |s| s.len() == 20).await;
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn failed_photo_does_not_hold_back_the_row() {
    let a = "https://cdn.example.com/a.png";
    let b = "https://cdn.example.com/b.png";
    let fetcher = Arc::new(
        RecordingFetcher::default()
            .with(a, Err(ReviewsError::BadData("connection reset".into())))
            .with(b, Ok(Bytes::from(create_test_png(12, 9)))),
    );
    let provider = Arc::new(BundledReviewsProvider::new(vec![review(0, &[a, b])], 1, 10));
    let controller = ReviewsController::spawn(Services::new(provider, fetcher.clone()), config(10));
    let mut rx = controller.subscribe();

    controller.load_more();
    let snapshot = wait_for(&mut rx, |s| {
        s.review_rows().next().is_some_and(|row| !row.photos.is_empty())
    })
    .await;

    let row = snapshot.review_rows().next().unwrap();
    assert_eq!(row.photos.len(), 1);
    assert_eq!((row.photos[0].width(), row.photos[0].height()), (12, 9));
    assert_eq!(row.photo_urls, vec![a.to_string(), b.to_string()]);

    // No retry for the failed URL
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(fetcher.requests(a), 1);
    assert_eq!(fetcher.requests(b), 1);
}

#[tokio::test]
async fn photos_keep_url_order() {
    let urls = [
        "https://cdn.example.com/1.png",
        "https://cdn.example.com/2.png",
        "https://cdn.example.com/3.png",
    ];
    let mut fetcher = StaticPhotoFetcher::new();
    for (i, url) in (1u32..).zip(urls) {
        fetcher.insert(url, create_test_png(i, i));
    }
    let provider = Arc::new(BundledReviewsProvider::new(vec![review(0, &urls)], 1, 10));
    let controller = ReviewsController::spawn(Services::new(provider, Arc::new(fetcher)), config(10));
    let mut rx = controller.subscribe();

    controller.load_more();
    let snapshot = wait_for(&mut rx, |s| {
        s.review_rows().next().is_some_and(|row| row.photos.len() == 3)
    })
    .await;

    let widths: Vec<u32> = snapshot.review_rows().next().unwrap().photos.iter().map(|p| p.width()).collect();
    assert_eq!(widths, vec![1, 2, 3]);
}

#[tokio::test]
async fn show_more_expands_row() {
    let provider = Arc::new(BundledReviewsProvider::new(reviews(3), 3, 10));
    let controller = ReviewsController::spawn(Services::new(provider, no_photos()), config(10));
    let mut rx = controller.subscribe();

    controller.load_more();
    let snapshot = wait_for(&mut rx, |s| s.len() == 4).await;
    let rows: Vec<_> = snapshot.review_rows().cloned().collect();
    assert!(rows.iter().all(|row| row.max_lines == 3));

    // 1. Through the row's own callback
    assert!(rows[1].tap_show_more());
    let snapshot = wait_for(&mut rx, |s| s.review_rows().nth(1).is_some_and(|r| r.is_expanded())).await;
    assert_eq!(snapshot.review_rows().filter(|r| r.is_expanded()).count(), 1);

    // 2. Through the controller
    controller.expand(rows[2].id);
    wait_for(&mut rx, |s| s.review_rows().nth(2).is_some_and(|r| r.is_expanded())).await;

    // 3. Through a detached handle
    assert!(controller.expand_handle().trigger(rows[0].id));
    let snapshot = wait_for(&mut rx, |s| s.review_rows().all(|r| r.is_expanded())).await;
    assert_eq!(snapshot.len(), 4);
}

struct FlakyProvider {
    inner: BundledReviewsProvider,
    calls: AtomicUsize,
}

#[async_trait]
impl ReviewsProvider for FlakyProvider {
    async fn get_reviews(&self, offset: usize) -> Result<Bytes, ReviewsError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(ReviewsError::Network("offline".into()));
        }
        self.inner.get_reviews(offset).await
    }
}

#[tokio::test]
async fn failed_page_can_be_requested_again() {
    let provider = Arc::new(FlakyProvider {
        inner: BundledReviewsProvider::new(reviews(15), 15, 10),
        calls: AtomicUsize::new(0),
    });
    let controller = ReviewsController::spawn(Services::new(provider.clone(), no_photos()), config(10));
    let mut rx = controller.subscribe();

    controller.load_more();
    wait_until(|| provider.calls.load(Ordering::SeqCst) == 1).await;
    tokio::time::sleep(Duration::from_millis(30)).await;
    let snapshot = controller.snapshot();
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.offset, 0);
    assert!(snapshot.should_load);

    controller.load_more();
    let snapshot = wait_for(&mut rx, |s| s.len() == 10).await;
    assert_eq!(snapshot.offset, 10);
}

#[tokio::test]
async fn teardown_ignores_late_completions() {
    let provider = Arc::new(CountingProvider::gated(BundledReviewsProvider::new(reviews(10), 10, 10)));
    let controller = ReviewsController::spawn(Services::new(provider.clone(), no_photos()), config(10));
    let mut rx = controller.subscribe();
    let handle = controller.expand_handle();

    controller.load_more();
    wait_until(|| provider.calls() == 1).await;
    drop(controller);

    provider.release(1);
    let closed = tokio::time::timeout(Duration::from_secs(5), async {
        while rx.changed().await.is_ok() {}
    })
    .await;
    assert!(closed.is_ok(), "snapshot channel should close after teardown");
    assert!(rx.borrow().is_empty());

    wait_until(|| !handle.trigger(reviews_core::RowId::generate())).await;
}

#[tokio::test]
async fn table_reflects_latest_snapshot() {
    let provider = Arc::new(BundledReviewsProvider::new(reviews(2), 2, 10));
    let controller = ReviewsController::spawn(Services::new(provider, no_photos()), config(10));
    let mut rx = controller.subscribe();

    controller.load_more();
    wait_for(&mut rx, |s| s.is_exhausted).await;

    let table = controller.table(Arc::new(FixedWidthMeasurer::default()));
    assert_eq!(table.number_of_rows(), 3);
    assert_eq!(table.height_for_row(2, 375.0), Some(29.0));
    assert!(table.height_for_row(0, 375.0).is_some_and(|h| h > 29.0));
}
