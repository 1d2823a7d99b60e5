//! Adapter between a [`ListSnapshot`] and a row-recycling list view.
//!
//! The view asks for a row count, a height per row and then hands a reusable
//! cell to [`ReviewsTable::bind_row`]. Heights and frames both come from
//! [`compute_layout`], so a cell is always bound with the geometry its height
//! was reported from.

use std::sync::Arc;

use image::RgbaImage;

use crate::app::ListSnapshot;
use crate::layout::{
    compute_layout, show_more_label, CountRowLayout, LayoutContext, ReviewRowLayout, RowLayout,
};
use crate::model::{CountRow, ReviewRow, RowItem, StyledText};
use crate::rating::RatingRenderer;
use crate::text::TextMeasurer;

/// Everything a cell needs to display one row.
#[derive(Debug)]
pub enum RowBinding<'a> {
    Review {
        row: &'a ReviewRow,
        layout: ReviewRowLayout,
        rating_image: RgbaImage,
        show_more: StyledText,
    },
    Count {
        row: &'a CountRow,
        label: StyledText,
        layout: CountRowLayout,
    },
}

/// A reusable view cell. Bound once per display; it must not keep the
/// previous row's content around.
pub trait RowCell {
    fn bind(&mut self, binding: RowBinding<'_>);
}

pub struct ReviewsTable {
    snapshot: ListSnapshot,
    measurer: Arc<dyn TextMeasurer>,
    rating: RatingRenderer,
}

impl ReviewsTable {
    pub fn new(snapshot: ListSnapshot, measurer: Arc<dyn TextMeasurer>) -> Self {
        Self {
            snapshot,
            measurer,
            rating: RatingRenderer::default(),
        }
    }

    #[must_use]
    pub fn with_rating_renderer(mut self, rating: RatingRenderer) -> Self {
        self.rating = rating;
        self
    }

    pub fn snapshot(&self) -> &ListSnapshot {
        &self.snapshot
    }

    pub fn number_of_rows(&self) -> usize {
        self.snapshot.len()
    }

    pub fn row(&self, index: usize) -> Option<&RowItem> {
        self.snapshot.items.get(index)
    }

    pub fn layout_for_row(&self, index: usize, width: f32) -> Option<RowLayout> {
        let row = self.row(index)?;
        let ctx = LayoutContext::new(self.measurer.as_ref(), &self.rating);
        Some(compute_layout(row, width, &ctx))
    }

    /// Row height at `width`; `None` past the end of the list.
    pub fn height_for_row(&self, index: usize, width: f32) -> Option<f32> {
        self.layout_for_row(index, width).map(|layout| layout.height())
    }

    /// Binds row `index` into `cell`. Returns false, leaving the cell
    /// untouched, when the index is out of range.
    pub fn bind_row(&self, index: usize, width: f32, cell: &mut dyn RowCell) -> bool {
        let Some(row) = self.row(index) else {
            return false;
        };
        let ctx = LayoutContext::new(self.measurer.as_ref(), &self.rating);

        let binding = match (row, compute_layout(row, width, &ctx)) {
            (RowItem::Review(review), RowLayout::Review(layout)) => RowBinding::Review {
                row: review,
                layout,
                rating_image: self.rating.render(review.rating),
                show_more: show_more_label(),
            },
            (RowItem::Count(count), RowLayout::Count(layout)) => RowBinding::Count {
                row: count,
                label: count.label(),
                layout,
            },
            _ => return false,
        };

        cell.bind(binding);
        true
    }
}

impl std::fmt::Debug for ReviewsTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewsTable")
            .field("rows", &self.snapshot.len())
            .finish_non_exhaustive()
    }
}
