//! Renders a star rating into a bitmap.

use image::{Rgba, RgbaImage};

use crate::geometry::Size;
use crate::model::Rating;

#[derive(Clone, Debug, PartialEq)]
pub struct RatingRendererConfig {
    pub star_count: u8,
    pub star_size: u32,
    pub spacing: u32,
    pub filled: Rgba<u8>,
    pub empty: Rgba<u8>,
}

impl Default for RatingRendererConfig {
    fn default() -> Self {
        Self {
            star_count: Rating::MAX,
            star_size: 16,
            spacing: 1,
            filled: Rgba([255, 184, 0, 255]),
            empty: Rgba([189, 189, 189, 255]),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RatingRenderer {
    config: RatingRendererConfig,
}

impl RatingRenderer {
    pub fn new(config: RatingRendererConfig) -> Self {
        Self { config }
    }

    fn pixel_width(&self) -> u32 {
        let count = u32::from(self.config.star_count);
        count * self.config.star_size + count.saturating_sub(1) * self.config.spacing
    }

    /// Size of every rendered rating, independent of its value.
    #[allow(clippy::cast_precision_loss)]
    pub fn image_size(&self) -> Size {
        Size::new(self.pixel_width() as f32, self.config.star_size as f32)
    }

    /// Draws `rating` filled stars followed by empty ones.
    #[allow(clippy::cast_precision_loss)]
    pub fn render(&self, rating: Rating) -> RgbaImage {
        let size = self.config.star_size;
        let mut img = RgbaImage::from_pixel(self.pixel_width(), size, Rgba([0, 0, 0, 0]));
        let outline = star_polygon(size as f32);

        for index in 0..u32::from(self.config.star_count) {
            let tint = if index < u32::from(rating.value()) {
                self.config.filled
            } else {
                self.config.empty
            };
            let left = index * (size + self.config.spacing);

            for y in 0..size {
                for x in 0..size {
                    // Sample at pixel centres.
                    if contains(&outline, x as f32 + 0.5, y as f32 + 0.5) {
                        img.put_pixel(left + x, y, tint);
                    }
                }
            }
        }

        img
    }
}

/// Five-pointed star inscribed in a `size` square, point up.
fn star_polygon(size: f32) -> Vec<(f32, f32)> {
    let centre = size / 2.0;
    let outer = size / 2.0;
    let inner = outer * 0.382;

    (0..10)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let angle = -std::f32::consts::FRAC_PI_2 + i as f32 * std::f32::consts::PI / 5.0;
            (centre + radius * angle.cos(), centre + radius * angle.sin())
        })
        .collect()
}

/// Even-odd point-in-polygon test.
fn contains(polygon: &[(f32, f32)], x: f32, y: f32) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (xi, yi) = polygon[i];
        let (xj, yj) = polygon[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_tint(img: &RgbaImage, tint: Rgba<u8>) -> usize {
        img.pixels().filter(|p| **p == tint).count()
    }

    #[test]
    fn default_size_is_five_stars_wide() {
        let renderer = RatingRenderer::default();
        assert_eq!(renderer.image_size(), Size::new(84.0, 16.0));
        let img = renderer.render(Rating::clamped(3));
        assert_eq!(img.dimensions(), (84, 16));
    }

    #[test]
    fn filled_area_grows_with_rating() {
        let renderer = RatingRenderer::default();
        let filled = RatingRendererConfig::default().filled;
        let one = count_tint(&renderer.render(Rating::clamped(1)), filled);
        let four = count_tint(&renderer.render(Rating::clamped(4)), filled);
        assert!(one > 0);
        assert_eq!(four, one * 4);
    }

    #[test]
    fn full_rating_has_no_empty_stars() {
        let renderer = RatingRenderer::default();
        let empty = RatingRendererConfig::default().empty;
        assert_eq!(count_tint(&renderer.render(Rating::clamped(5)), empty), 0);
    }

    #[test]
    fn star_centre_is_inside() {
        let outline = star_polygon(16.0);
        assert!(contains(&outline, 8.0, 8.0));
        assert!(!contains(&outline, 0.5, 15.5));
    }
}
