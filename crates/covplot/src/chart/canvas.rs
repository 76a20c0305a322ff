//! RGBA drawing surface
//!
//! Rectangles, lines and bitmap text over an [`RgbaImage`]. Everything is
//! clipped to the image bounds.

use super::font::{BitmapFont, GLYPH_HEIGHT, GLYPH_WIDTH};
use super::palette::Rgb;
use image::RgbaImage;

/// Drawing surface for the chart
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Create a canvas filled with `background`
    #[must_use]
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, background.to_rgba()),
        }
    }

    /// Canvas size in pixels
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Borrow the pixels
    #[must_use]
    pub const fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Take the pixels
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Draw a filled rectangle
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgb) {
        let (img_width, img_height) = self.image.dimensions();
        let x_end = x.saturating_add(width).min(img_width);
        let y_end = y.saturating_add(height).min(img_height);
        let pixel = color.to_rgba();

        for py in y..y_end {
            for px in x..x_end {
                self.image.put_pixel(px, py, pixel);
            }
        }
    }

    /// Draw a horizontal line
    pub fn hline(&mut self, x: u32, y: u32, length: u32, color: Rgb) {
        self.fill_rect(x, y, length, 1, color);
    }

    /// Draw a vertical line
    pub fn vline(&mut self, x: u32, y: u32, length: u32, color: Rgb) {
        self.fill_rect(x, y, 1, length, color);
    }

    /// Draw text with its top-left corner at (`x`, `y`)
    pub fn draw_text(&mut self, x: u32, y: u32, text: &str, font: BitmapFont, color: Rgb) {
        let scale = font.scale();
        for (index, c) in text.chars().enumerate() {
            let origin_x = x.saturating_add(index as u32 * font.advance());
            for col in 0..GLYPH_WIDTH {
                for row in 0..GLYPH_HEIGHT {
                    if BitmapFont::is_set(c, col, row) {
                        self.fill_rect(
                            origin_x + col * scale,
                            y + row * scale,
                            scale,
                            scale,
                            color,
                        );
                    }
                }
            }
        }
    }

    /// Draw text rotated a quarter turn counter-clockwise, reading bottom to top
    ///
    /// (`x`, `y`) is the top-left of the rotated text's bounding box, which is
    /// `font.height()` wide and `font.text_width(text)` tall.
    pub fn draw_text_vertical(&mut self, x: u32, y: u32, text: &str, font: BitmapFont, color: Rgb) {
        let scale = font.scale();
        let span = font.text_width(text);
        for (index, c) in text.chars().enumerate() {
            let along = index as u32 * font.advance();
            for col in 0..GLYPH_WIDTH {
                for row in 0..GLYPH_HEIGHT {
                    if BitmapFont::is_set(c, col, row) {
                        // glyph column runs up the page, glyph row runs right
                        let px = x + row * scale;
                        let Some(py) = (y + span).checked_sub(along + (col + 1) * scale) else {
                            continue;
                        };
                        self.fill_rect(px, py, scale, scale, color);
                    }
                }
            }
        }
    }
}
