use bytes::Bytes;

use crate::config::ReviewsConfig;
use crate::error::ReviewsError;
use crate::model::{ExpandHandle, Photo, RowId};
use crate::prefetch::ScrollGeometry;

/// Everything that can happen to the review list, from the shell, the
/// renderer or from completed fetches.
#[derive(Clone, Debug)]
pub enum Event {
    // Shell
    /// Replaces the configuration and the row callback. Only honoured while
    /// the list is still empty and idle.
    Configured {
        config: ReviewsConfig,
        expand_handle: ExpandHandle,
    },

    // Renderer
    LoadMoreRequested,
    ScrollEnded(ScrollGeometry),
    ShowMoreTapped {
        id: RowId,
    },

    // Completions
    PageLoaded(Result<Bytes, ReviewsError>),
    PhotoLoaded {
        row: RowId,
        slot: usize,
        result: Result<Photo, ReviewsError>,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Configured { .. } => "configured",
            Self::LoadMoreRequested => "load_more_requested",
            Self::ScrollEnded(_) => "scroll_ended",
            Self::ShowMoreTapped { .. } => "show_more_tapped",
            Self::PageLoaded(_) => "page_loaded",
            Self::PhotoLoaded { .. } => "photo_loaded",
        }
    }

    pub fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::LoadMoreRequested | Self::ScrollEnded(_) | Self::ShowMoreTapped { .. }
        )
    }
}
