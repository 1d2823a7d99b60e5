use std::collections::HashMap;

use tracing::debug;

use crate::model::{CountRow, Photo, ReviewRow, RowId, RowItem};

/// Ordered rows plus the pagination cursor.
///
/// Rows are only ever appended, or replaced in place at the same index, so
/// the id index never needs rebuilding.
#[derive(Clone, Debug)]
pub struct ListState {
    items: Vec<RowItem>,
    index: HashMap<RowId, usize>,
    offset: usize,
    limit: usize,
    should_load: bool,
}

impl ListState {
    pub fn new(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            offset: 0,
            limit,
            should_load: true,
        }
    }

    pub fn items(&self) -> &[RowItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn should_load(&self) -> bool {
        self.should_load
    }

    /// Pagination is finished once the count row has been appended.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.items.last(), Some(RowItem::Count(_)))
    }

    pub fn count_row(&self) -> Option<&CountRow> {
        self.items.last().and_then(RowItem::as_count)
    }

    pub fn row(&self, id: RowId) -> Option<&ReviewRow> {
        self.index
            .get(&id)
            .and_then(|&index| self.items.get(index))
            .and_then(RowItem::as_review)
    }

    fn row_mut(&mut self, id: RowId) -> Option<&mut ReviewRow> {
        let index = *self.index.get(&id)?;
        match self.items.get_mut(index) {
            Some(RowItem::Review(row)) => Some(row),
            _ => None,
        }
    }

    /// Admission control: returns the offset to request, or `None` when a
    /// page is already in flight or pagination is exhausted.
    pub fn begin_load(&mut self) -> Option<usize> {
        if !self.should_load || self.is_exhausted() {
            return None;
        }
        self.should_load = false;
        Some(self.offset)
    }

    /// Appends a decoded page and advances the cursor. Appends the count row
    /// when `total` has been reached.
    pub fn apply_page(&mut self, rows: Vec<ReviewRow>, total: usize) {
        if self.is_exhausted() {
            debug!("ignoring page after pagination finished");
            return;
        }

        self.items.reserve(rows.len());
        for row in rows {
            self.index.insert(row.id, self.items.len());
            self.items.push(RowItem::Review(row));
        }

        self.offset += self.limit;
        self.should_load = self.offset < total;

        if !self.should_load {
            let review_count = self.items.len();
            self.items.push(RowItem::Count(CountRow { review_count }));
            debug!(review_count, "pagination exhausted");
        }
    }

    /// Re-arms loading after a failed page; rows are left untouched.
    pub fn fail_page(&mut self) {
        if !self.is_exhausted() {
            self.should_load = true;
        }
    }

    /// Lifts the line cap on a row. Returns false when the id is unknown.
    pub fn expand(&mut self, id: RowId) -> bool {
        match self.row_mut(id) {
            Some(row) => {
                row.max_lines = ReviewRow::UNLIMITED_LINES;
                true
            }
            None => false,
        }
    }

    /// Replaces a row's photo list. Returns false when the id is unknown.
    pub fn set_photos(&mut self, id: RowId, photos: Vec<Photo>) -> bool {
        match self.row_mut(id) {
            Some(row) => {
                row.photos = photos;
                true
            }
            None => false,
        }
    }
}
