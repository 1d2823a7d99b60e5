//! Shell-side I/O the controller resolves capability requests with: where
//! pages come from and where photo bytes come from. Both are injected;
//! nothing here is global.

mod photo;
mod provider;

use std::sync::Arc;

pub use self::photo::{PhotoFetcher, StaticPhotoFetcher};
pub use self::provider::{BundledReviewsProvider, ReviewsProvider, BUNDLED_REVIEWS};

#[derive(Clone)]
pub struct Services {
    pub reviews: Arc<dyn ReviewsProvider>,
    pub photos: Arc<dyn PhotoFetcher>,
}

impl Services {
    pub fn new(reviews: Arc<dyn ReviewsProvider>, photos: Arc<dyn PhotoFetcher>) -> Self {
        Self { reviews, photos }
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
