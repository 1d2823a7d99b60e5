//! Text measurement.
//!
//! Real font metrics belong to the host platform; the layout engine only
//! depends on [`TextMeasurer`]. [`FixedWidthMeasurer`] is a deterministic
//! implementation with one glyph advance per display column, good enough for
//! terminal-like shells and for tests.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::geometry::Size;
use crate::model::{StyledText, TextStyle};

pub trait TextMeasurer: Send + Sync {
    fn line_height(&self, style: TextStyle) -> f32;

    /// Bounding size of `text` wrapped at `width`. With `max_height`, only the
    /// whole lines that fit are counted.
    fn measure(&self, text: &StyledText, width: f32, max_height: Option<f32>) -> Size;

    /// Single-line natural size.
    fn intrinsic_size(&self, text: &StyledText) -> Size {
        self.measure(text, f32::INFINITY, None)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontMetrics {
    pub glyph_width: f32,
    pub line_height: f32,
}

impl FontMetrics {
    pub const fn new(glyph_width: f32, line_height: f32) -> Self {
        Self {
            glyph_width,
            line_height,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FixedWidthMeasurer {
    pub text: FontMetrics,
    pub username: FontMetrics,
    pub created: FontMetrics,
    pub show_more: FontMetrics,
    pub review_count: FontMetrics,
}

impl Default for FixedWidthMeasurer {
    fn default() -> Self {
        Self {
            text: FontMetrics::new(8.0, 20.0),
            username: FontMetrics::new(9.0, 20.0),
            created: FontMetrics::new(6.0, 16.0),
            show_more: FontMetrics::new(8.0, 20.0),
            review_count: FontMetrics::new(8.0, 20.0),
        }
    }
}

impl FixedWidthMeasurer {
    pub fn metrics(&self, style: TextStyle) -> FontMetrics {
        match style {
            TextStyle::Text => self.text,
            TextStyle::Username => self.username,
            TextStyle::Created => self.created,
            TextStyle::ShowMore => self.show_more,
            TextStyle::ReviewCount => self.review_count,
        }
    }
}

impl TextMeasurer for FixedWidthMeasurer {
    fn line_height(&self, style: TextStyle) -> f32 {
        self.metrics(style).line_height
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn measure(&self, text: &StyledText, width: f32, max_height: Option<f32>) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }

        let metrics = self.metrics(text.style);
        let columns = if width.is_finite() {
            ((width / metrics.glyph_width).floor() as usize).max(1)
        } else {
            usize::MAX
        };

        let lines = wrap_columns(text.as_str(), columns);
        let visible = match max_height {
            Some(height) => ((height / metrics.line_height).floor().max(0.0) as usize).min(lines.len()),
            None => lines.len(),
        };
        let widest = lines[..visible].iter().copied().max().unwrap_or(0);

        Size::new(
            widest as f32 * metrics.glyph_width,
            visible as f32 * metrics.line_height,
        )
    }
}

/// Greedy word wrap. Returns the display width of each resulting line.
fn wrap_columns(text: &str, max_columns: usize) -> Vec<usize> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = 0usize;

        for word in paragraph.split_whitespace() {
            let word_width = UnicodeWidthStr::width(word);
            let needed = if current == 0 {
                word_width
            } else {
                current + 1 + word_width
            };

            if needed <= max_columns {
                current = needed;
                continue;
            }

            if current > 0 {
                lines.push(current);
                current = 0;
            }

            if word_width <= max_columns {
                current = word_width;
                continue;
            }

            // Word wider than a line: break it between glyphs.
            for ch in word.chars() {
                let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
                if current > 0 && current + ch_width > max_columns {
                    lines.push(current);
                    current = 0;
                }
                current += ch_width;
            }
        }

        lines.push(current);
    }

    lines
}
