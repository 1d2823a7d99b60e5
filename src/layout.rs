//! Row geometry.
//!
//! [`compute_layout`] turns a row's content and the available width into the
//! frame of every sub-element and the row height. It keeps no state between
//! calls, so a width change is handled by simply calling it again.

use crate::geometry::{EdgeInsets, Point, Rect, Size};
use crate::model::{CountRow, ReviewRow, RowItem, StyledText, TextStyle};
use crate::rating::RatingRenderer;
use crate::text::TextMeasurer;

/// Padding between the row edges and its content.
pub const INSETS: EdgeInsets = EdgeInsets::new(9.0, 12.0, 9.0, 12.0);

pub const AVATAR_SIZE: Size = Size::new(36.0, 36.0);
pub const AVATAR_CORNER_RADIUS: f32 = 18.0;

pub const PHOTO_SIZE: Size = Size::new(55.0, 66.0);
pub const PHOTO_CORNER_RADIUS: f32 = 8.0;
/// Horizontal gap between neighbouring photos in the strip.
pub const PHOTOS_SPACING: f32 = 8.0;

/// Horizontal gap between the avatar and the reviewer name.
pub const AVATAR_TO_USERNAME_SPACING: f32 = 10.0;
/// Below the reviewer name, above the rating.
pub const USERNAME_TO_RATING_SPACING: f32 = 6.0;
/// Below the rating, above the photo strip or the review text.
pub const RATING_TO_TEXT_SPACING: f32 = 6.0;
/// Below the photo strip, above the review text.
pub const PHOTOS_TO_TEXT_SPACING: f32 = 10.0;
/// Below the review text, above "show more" or the date.
pub const REVIEW_TEXT_TO_CREATED_SPACING: f32 = 6.0;
/// Below "show more", above the date.
pub const SHOW_MORE_TO_CREATED_SPACING: f32 = 6.0;

/// Height of the label in the trailing count row.
pub const COUNT_LABEL_HEIGHT: f32 = 20.0;

pub const SHOW_MORE_TEXT: &str = "Show more...";

pub fn show_more_label() -> StyledText {
    StyledText::new(SHOW_MORE_TEXT, TextStyle::ShowMore)
}

/// Platform services the layout engine measures with.
#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    pub measurer: &'a dyn TextMeasurer,
    pub rating: &'a RatingRenderer,
}

impl<'a> LayoutContext<'a> {
    pub fn new(measurer: &'a dyn TextMeasurer, rating: &'a RatingRenderer) -> Self {
        Self { measurer, rating }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReviewRowLayout {
    pub avatar: Rect,
    pub reviewer_name: Rect,
    pub rating: Rect,
    /// The whole photo strip; `Rect::ZERO` without photos.
    pub photos: Rect,
    pub photo_count: usize,
    pub review_text: Rect,
    /// `Rect::ZERO` when the text fits in its line cap.
    pub show_more: Rect,
    pub created: Rect,
    pub height: f32,
}

impl ReviewRowLayout {
    pub fn shows_show_more(&self) -> bool {
        !self.show_more.is_empty()
    }

    /// Frame of each photo inside the strip, left to right.
    #[allow(clippy::cast_precision_loss)]
    pub fn photo_frames(&self) -> impl Iterator<Item = Rect> + '_ {
        (0..self.photo_count).map(move |index| {
            Rect::new(
                self.photos.x + index as f32 * (PHOTO_SIZE.width + PHOTOS_SPACING),
                self.photos.y,
                PHOTO_SIZE.width,
                PHOTO_SIZE.height,
            )
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CountRowLayout {
    pub label: Rect,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RowLayout {
    Review(ReviewRowLayout),
    Count(CountRowLayout),
}

impl RowLayout {
    pub fn height(&self) -> f32 {
        match self {
            Self::Review(layout) => layout.height,
            Self::Count(layout) => layout.height,
        }
    }
}

pub fn compute_layout(row: &RowItem, max_width: f32, ctx: &LayoutContext<'_>) -> RowLayout {
    match row {
        RowItem::Review(review) => RowLayout::Review(layout_review(review, max_width, ctx)),
        RowItem::Count(count) => RowLayout::Count(layout_count(count, max_width)),
    }
}

#[allow(clippy::cast_precision_loss)]
pub fn layout_review(row: &ReviewRow, max_width: f32, ctx: &LayoutContext<'_>) -> ReviewRowLayout {
    let width = (max_width - INSETS.horizontal()).max(0.0);
    let mut max_y = INSETS.top;

    let avatar = Rect::from_origin_size(Point::new(INSETS.left, max_y), AVATAR_SIZE);

    let content_x = avatar.max_x() + AVATAR_TO_USERNAME_SPACING;
    let reviewer_name = Rect::new(
        content_x,
        max_y,
        (width - AVATAR_SIZE.width - AVATAR_TO_USERNAME_SPACING).max(0.0),
        ctx.measurer.line_height(row.reviewer_name.style),
    );
    max_y = reviewer_name.max_y() + USERNAME_TO_RATING_SPACING;

    let rating = Rect::from_origin_size(Point::new(content_x, max_y), ctx.rating.image_size());

    max_y = rating.max_y() + RATING_TO_TEXT_SPACING;

    let photo_count = row.photos.len();
    let photos = if photo_count > 0 {
        let count = photo_count as f32;
        let strip = Rect::new(
            content_x,
            max_y,
            PHOTO_SIZE.width * count + PHOTOS_SPACING * (count - 1.0),
            PHOTO_SIZE.height,
        );
        max_y = strip.max_y() + PHOTOS_TO_TEXT_SPACING;
        strip
    } else {
        Rect::ZERO
    };

    let mut show_show_more = false;
    let review_text = if row.text.is_empty() {
        Rect::ZERO
    } else {
        // Height under the current line cap; no cap when unlimited.
        let current_height = (!row.is_expanded())
            .then(|| ctx.measurer.line_height(row.text.style) * row.max_lines as f32);
        let actual_height = ctx.measurer.measure(&row.text, width, None).height;
        show_show_more = current_height.is_some_and(|current| actual_height > current);

        let limited = ctx.measurer.measure(&row.text, width, current_height);
        let frame = Rect::from_origin_size(
            Point::new(content_x, max_y),
            Size::new(limited.width.min(width), limited.height),
        );
        max_y = frame.max_y() + REVIEW_TEXT_TO_CREATED_SPACING;
        frame
    };

    let show_more = if show_show_more {
        let frame = Rect::from_origin_size(
            Point::new(content_x, max_y),
            ctx.measurer.intrinsic_size(&show_more_label()),
        );
        max_y = frame.max_y() + SHOW_MORE_TO_CREATED_SPACING;
        frame
    } else {
        Rect::ZERO
    };

    let created = Rect::from_origin_size(
        Point::new(content_x, max_y),
        ctx.measurer.measure(&row.created, width, None),
    );

    ReviewRowLayout {
        avatar,
        reviewer_name,
        rating,
        photos,
        photo_count,
        review_text,
        show_more,
        created,
        height: created.max_y() + INSETS.bottom,
    }
}

pub fn layout_count(_row: &CountRow, max_width: f32) -> CountRowLayout {
    let label = Rect::new(0.0, INSETS.top, max_width.max(0.0), COUNT_LABEL_HEIGHT);
    CountRowLayout {
        label,
        height: label.max_y(),
    }
}
