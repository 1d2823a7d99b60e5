use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

use image::{DynamicImage, GenericImageView};
use uuid::Uuid;

use crate::config::DEFAULT_MAX_LINES;

// --- Wire types ---

/// A review as delivered by the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub text: String,
    pub created: String,
    pub first_name: String,
    pub last_name: String,
    pub rating: i64,
    #[serde(default)]
    pub photo_urls: Option<Vec<String>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCount {
    pub count: usize,
}

/// One page of the provider payload: the reviews at the requested offset plus
/// the total number available.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewsPage {
    pub items: Vec<Review>,
    pub count: usize,
}

impl ReviewsPage {
    pub fn total(&self) -> ReviewCount {
        ReviewCount { count: self.count }
    }
}

// --- Row identity ---

/// Stable handle for a review row. Generated once, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowId(Uuid);

impl RowId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// --- Styled content ---

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextStyle {
    Text,
    Username,
    Created,
    ShowMore,
    ReviewCount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledText {
    pub text: String,
    pub style: TextStyle,
}

impl StyledText {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Star rating, always within 1..=5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Out-of-range values from the wire are clamped rather than rejected.
    pub fn clamped(value: i64) -> Self {
        let clamped = value.clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        Self(u8::try_from(clamped).unwrap_or(Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// A decoded review photo. Cheap to clone.
#[derive(Clone)]
pub struct Photo {
    image: Arc<DynamicImage>,
}

impl Photo {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.dimensions().0
    }

    pub fn height(&self) -> u32 {
        self.image.dimensions().1
    }
}

// Pixel data is not useful in debug output.
impl fmt::Debug for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Photo")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl PartialEq for Photo {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }
}

// Shells across the FFI boundary only get the dimensions; pixels stay in
// process.
impl Serialize for Photo {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Photo", 2)?;
        state.serialize_field("width", &self.width())?;
        state.serialize_field("height", &self.height())?;
        state.end()
    }
}

// --- Show-more callback ---

/// Callback carried by each review row; invoking it asks the owner of the
/// list to lift the row's line cap.
#[derive(Clone, Default)]
pub struct ExpandHandle {
    notify: Option<Arc<dyn Fn(RowId) -> bool + Send + Sync>>,
}

impl ExpandHandle {
    /// `notify` returns false once nobody is listening any more.
    pub fn new(notify: impl Fn(RowId) -> bool + Send + Sync + 'static) -> Self {
        Self {
            notify: Some(Arc::new(notify)),
        }
    }

    /// A handle that goes nowhere, for rows built outside a running controller.
    pub fn detached() -> Self {
        Self { notify: None }
    }

    pub fn is_attached(&self) -> bool {
        self.notify.is_some()
    }

    /// Returns false when nobody is listening any more (screen torn down).
    pub fn trigger(&self, id: RowId) -> bool {
        self.notify.as_ref().is_some_and(|notify| notify(id))
    }
}

impl fmt::Debug for ExpandHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpandHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}

// --- Rows ---

#[derive(Clone, Debug, Serialize)]
pub struct ReviewRow {
    pub id: RowId,
    pub text: StyledText,
    pub reviewer_name: StyledText,
    pub created: StyledText,
    pub rating: Rating,
    /// Line cap for `text`; 0 means unlimited.
    pub max_lines: u32,
    pub photos: Vec<Photo>,
    pub photo_urls: Vec<String>,
    #[serde(skip)]
    pub on_show_more: ExpandHandle,
}

impl ReviewRow {
    pub const UNLIMITED_LINES: u32 = 0;

    pub fn from_review(review: Review, max_lines: u32, on_show_more: ExpandHandle) -> Self {
        let reviewer_name = format!("{} {}", review.first_name, review.last_name);
        Self {
            id: RowId::generate(),
            text: StyledText::new(review.text, TextStyle::Text),
            reviewer_name: StyledText::new(reviewer_name, TextStyle::Username),
            created: StyledText::new(review.created, TextStyle::Created),
            rating: Rating::clamped(review.rating),
            max_lines,
            photos: Vec::new(),
            photo_urls: review.photo_urls.unwrap_or_default(),
            on_show_more,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.max_lines == Self::UNLIMITED_LINES
    }

    /// Invokes the row's show-more callback with its own id.
    pub fn tap_show_more(&self) -> bool {
        self.on_show_more.trigger(self.id)
    }
}

impl Default for ReviewRow {
    fn default() -> Self {
        Self {
            id: RowId::generate(),
            text: StyledText::new("", TextStyle::Text),
            reviewer_name: StyledText::new("", TextStyle::Username),
            created: StyledText::new("", TextStyle::Created),
            rating: Rating::clamped(i64::from(Rating::MAX)),
            max_lines: DEFAULT_MAX_LINES,
            photos: Vec::new(),
            photo_urls: Vec::new(),
            on_show_more: ExpandHandle::detached(),
        }
    }
}

/// Trailing summary row, appended once pagination is exhausted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CountRow {
    pub review_count: usize,
}

impl CountRow {
    pub fn label(&self) -> StyledText {
        StyledText::new(
            format!("{} reviews", self.review_count),
            TextStyle::ReviewCount,
        )
    }
}

#[derive(Clone, Debug, Serialize)]
pub enum RowItem {
    Review(ReviewRow),
    Count(CountRow),
}

impl RowItem {
    pub fn review_id(&self) -> Option<RowId> {
        match self {
            Self::Review(row) => Some(row.id),
            Self::Count(_) => None,
        }
    }

    pub fn as_review(&self) -> Option<&ReviewRow> {
        match self {
            Self::Review(row) => Some(row),
            Self::Count(_) => None,
        }
    }

    pub fn as_count(&self) -> Option<&CountRow> {
        match self {
            Self::Count(row) => Some(row),
            Self::Review(_) => None,
        }
    }
}
