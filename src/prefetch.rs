//! Scroll-driven prefetch: request the next page while there is still some
//! content left below the point where scrolling will come to rest.

use crate::config::DEFAULT_SCREENS_TO_LOAD_NEXT_PAGE;

/// Scroll view geometry at the moment dragging ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollGeometry {
    pub viewport_height: f32,
    pub content_height: f32,
    /// Offset the scroll view is going to settle at.
    pub target_offset: f32,
}

impl ScrollGeometry {
    /// Distance between the bottom of the settled viewport and the end of
    /// the content.
    pub fn remaining_distance(&self) -> f32 {
        self.content_height - self.viewport_height - self.target_offset
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrefetchPolicy {
    pub screens_to_load_next_page: f32,
}

impl Default for PrefetchPolicy {
    fn default() -> Self {
        Self {
            screens_to_load_next_page: DEFAULT_SCREENS_TO_LOAD_NEXT_PAGE,
        }
    }
}

impl PrefetchPolicy {
    pub fn new(screens_to_load_next_page: f32) -> Self {
        Self {
            screens_to_load_next_page,
        }
    }

    pub fn trigger_distance(&self, viewport_height: f32) -> f32 {
        viewport_height * self.screens_to_load_next_page
    }

    pub fn should_load_next_page(&self, geometry: &ScrollGeometry) -> bool {
        geometry.remaining_distance() <= self.trigger_distance(geometry.viewport_height)
    }
}
