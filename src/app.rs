//! The review list app.
//!
//! `update` only mutates the model. Anything that needs the outside world
//! goes through a capability, and its outcome comes back as an [`Event`].

use std::collections::HashMap;

use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::capabilities::Capabilities;
use crate::config::ReviewsConfig;
use crate::error::ReviewsError;
use crate::event::Event;
use crate::model::{ExpandHandle, Photo, ReviewRow, ReviewsPage, RowId, RowItem};
use crate::prefetch::PrefetchPolicy;
use crate::state::ListState;

#[derive(Clone, Debug)]
enum PhotoSlot {
    Pending,
    Loaded(Photo),
    Failed,
}

/// Photos of one row, collected until every URL has settled.
#[derive(Clone, Debug)]
struct PhotoBatch {
    slots: Vec<PhotoSlot>,
}

impl PhotoBatch {
    fn new(len: usize) -> Self {
        Self {
            slots: vec![PhotoSlot::Pending; len],
        }
    }

    /// Returns true once no slot is pending. Repeated or out-of-range
    /// completions are ignored.
    fn settle(&mut self, slot: usize, result: Result<Photo, ReviewsError>) -> bool {
        if let Some(entry) = self.slots.get_mut(slot) {
            if matches!(entry, PhotoSlot::Pending) {
                *entry = match result {
                    Ok(photo) => PhotoSlot::Loaded(photo),
                    Err(_) => PhotoSlot::Failed,
                };
            }
        }
        self.slots
            .iter()
            .all(|slot| !matches!(slot, PhotoSlot::Pending))
    }

    /// Loaded photos in URL order.
    fn into_photos(self) -> Vec<Photo> {
        self.slots
            .into_iter()
            .filter_map(|slot| match slot {
                PhotoSlot::Loaded(photo) => Some(photo),
                PhotoSlot::Pending | PhotoSlot::Failed => None,
            })
            .collect()
    }
}

#[derive(Clone, Debug)]
pub struct Model {
    pub list: ListState,
    config: ReviewsConfig,
    photo_batches: HashMap<RowId, PhotoBatch>,
    expand_handle: ExpandHandle,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(ReviewsConfig::default())
    }
}

impl Model {
    pub fn new(config: ReviewsConfig) -> Self {
        Self::with_expand_handle(config, ExpandHandle::detached())
    }

    pub fn with_expand_handle(config: ReviewsConfig, expand_handle: ExpandHandle) -> Self {
        Self {
            list: ListState::new(config.page_size),
            config,
            photo_batches: HashMap::new(),
            expand_handle,
        }
    }

    pub fn config(&self) -> &ReviewsConfig {
        &self.config
    }

    /// Rows still waiting on at least one photo.
    pub fn pending_photo_rows(&self) -> usize {
        self.photo_batches.len()
    }

    fn prefetch(&self) -> PrefetchPolicy {
        PrefetchPolicy::new(self.config.screens_to_load_next_page)
    }

    /// Nothing requested, nothing received.
    fn is_pristine(&self) -> bool {
        self.list.is_empty() && self.list.should_load() && self.list.offset() == 0
    }
}

/// Value snapshot of the list handed to observers on every state change.
#[derive(Clone, Debug, Serialize)]
pub struct ListSnapshot {
    pub items: Vec<RowItem>,
    pub offset: usize,
    pub should_load: bool,
    pub is_exhausted: bool,
}

impl Default for ListSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl ListSnapshot {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            offset: 0,
            should_load: true,
            is_exhausted: false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn review_rows(&self) -> impl Iterator<Item = &ReviewRow> {
        self.items.iter().filter_map(RowItem::as_review)
    }
}

#[derive(Default)]
pub struct ReviewsApp;

impl crux_core::App for ReviewsApp {
    type Event = Event;
    type Model = Model;
    type ViewModel = ListSnapshot;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(
            event = event.name(),
            user_initiated = event.is_user_initiated(),
            "update"
        );

        match event {
            Event::Configured {
                config,
                expand_handle,
            } => {
                if model.is_pristine() {
                    info!(page_size = config.page_size, "review list configured");
                    *model = Model::with_expand_handle(config, expand_handle);
                    caps.render.render();
                } else {
                    warn!("configuration ignored after loading started");
                }
            }

            Event::LoadMoreRequested => Self::load_more(model, caps),

            Event::ScrollEnded(geometry) => {
                if model.prefetch().should_load_next_page(&geometry) {
                    Self::load_more(model, caps);
                }
            }

            Event::PageLoaded(result) => Self::page_loaded(result, model, caps),

            Event::ShowMoreTapped { id } => {
                if model.list.expand(id) {
                    caps.render.render();
                } else {
                    debug!(%id, "show more for a row that is no longer listed");
                }
            }

            Event::PhotoLoaded { row, slot, result } => {
                Self::photo_loaded(row, slot, result, model, caps);
            }
        }
    }

    fn view(&self, model: &Model) -> ListSnapshot {
        ListSnapshot {
            items: model.list.items().to_vec(),
            offset: model.list.offset(),
            should_load: model.list.should_load(),
            is_exhausted: model.list.is_exhausted(),
        }
    }
}

impl ReviewsApp {
    fn load_more(model: &mut Model, caps: &Capabilities) {
        if let Some(offset) = model.list.begin_load() {
            debug!(offset, "requesting page");
            caps.reviews.get_reviews(offset, Event::PageLoaded);
        }
    }

    fn page_loaded(result: Result<Bytes, ReviewsError>, model: &mut Model, caps: &Capabilities) {
        if model.list.is_exhausted() {
            debug!("page arrived after pagination finished");
            return;
        }

        let page = match result.and_then(|bytes| decode_page(&bytes)) {
            Ok(page) => page,
            Err(e) => {
                warn!(code = e.code(), error = %e, "page request failed");
                model.list.fail_page();
                caps.render.render();
                return;
            }
        };

        let total = page.total().count;
        let mut photo_requests = Vec::new();
        let rows: Vec<ReviewRow> = page
            .items
            .into_iter()
            .map(|review| {
                let row = ReviewRow::from_review(
                    review,
                    model.config.default_max_lines,
                    model.expand_handle.clone(),
                );
                if !row.photo_urls.is_empty() {
                    model
                        .photo_batches
                        .insert(row.id, PhotoBatch::new(row.photo_urls.len()));
                    photo_requests.extend(
                        row.photo_urls
                            .iter()
                            .enumerate()
                            .map(|(slot, url)| (row.id, slot, url.clone())),
                    );
                }
                row
            })
            .collect();

        let received = rows.len();
        model.list.apply_page(rows, total);
        info!(
            received,
            total,
            offset = model.list.offset(),
            should_load = model.list.should_load(),
            "page applied"
        );
        caps.render.render();

        for (row, slot, url) in photo_requests {
            caps.photos
                .fetch(url, model.config.photo.clone(), move |result| Event::PhotoLoaded {
                    row,
                    slot,
                    result,
                });
        }
    }

    fn photo_loaded(
        row: RowId,
        slot: usize,
        result: Result<Photo, ReviewsError>,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        let Some(batch) = model.photo_batches.get_mut(&row) else {
            debug!(%row, slot, "photo for a row without pending photos");
            return;
        };

        if let Err(e) = &result {
            debug!(%row, slot, code = e.code(), error = %e, "photo skipped");
        }

        if !batch.settle(slot, result) {
            return;
        }

        let photos = model
            .photo_batches
            .remove(&row)
            .map(PhotoBatch::into_photos)
            .unwrap_or_default();
        debug!(%row, loaded = photos.len(), "photos settled");
        model.list.set_photos(row, photos);

        caps.render.render();
    }
}

pub fn decode_page(bytes: &[u8]) -> Result<ReviewsPage, ReviewsError> {
    Ok(serde_json::from_slice(bytes)?)
}
