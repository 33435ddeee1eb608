//! Text rendering primitives shared by all templates.
//!
//! Two backends: outline fonts rasterized with ab_glyph (anti-aliased
//! grayscale), and the built-in Spleen 12x24 bitmap font scaled by integer
//! factors. Spleen is monospaced, which keeps zero-padded identifiers
//! visually aligned across labels; it also needs no font files, so it is
//! the fallback when no outline font is resolvable.

use ab_glyph::{point, Font, ScaleFont};
use image::GrayImage;
use spleen_font::{PSF2Font, FONT_12X24};

use crate::fonts::FontHandle;

/// Spleen base glyph dimensions.
const BITMAP_W: usize = 12;
const BITMAP_H: usize = 24;

/// Ellipsis appended to truncated lines. Plain ASCII so the bitmap
/// fallback renders it too.
pub const ELLIPSIS: &str = "...";

/// Integer scale factor the bitmap font uses for a requested pixel height.
fn bitmap_scale(px: f32) -> usize {
    ((px / BITMAP_H as f32).round() as usize).max(1)
}

/// Line height in pixels at the given size.
pub fn line_height(font: &FontHandle, px: f32) -> u32 {
    match font {
        FontHandle::Ttf(font) => {
            let scaled = font.as_scaled(px);
            (scaled.ascent() - scaled.descent()).ceil() as u32
        }
        FontHandle::Bitmap => (bitmap_scale(px) * BITMAP_H) as u32,
    }
}

/// Advance width of `text` in pixels at the given size.
pub fn measure(font: &FontHandle, px: f32, text: &str) -> f32 {
    match font {
        FontHandle::Ttf(font) => {
            let scaled = font.as_scaled(px);
            text.chars()
                .map(|ch| scaled.h_advance(font.glyph_id(ch)))
                .sum()
        }
        FontHandle::Bitmap => {
            (text.chars().count() * bitmap_scale(px) * BITMAP_W) as f32
        }
    }
}

/// Draw one line of text with its top-left corner at `(x, y)`.
/// Pixels outside the surface are clipped.
pub fn draw(surface: &mut GrayImage, font: &FontHandle, px: f32, x: i32, y: i32, text: &str) {
    match font {
        FontHandle::Ttf(font) => draw_ttf(surface, font, px, x, y, text),
        FontHandle::Bitmap => draw_bitmap(surface, px, x, y, text),
    }
}

fn draw_ttf(surface: &mut GrayImage, font: &ab_glyph::FontArc, px: f32, x: i32, y: i32, text: &str) {
    let scaled = font.as_scaled(px);
    let baseline = y as f32 + scaled.ascent();

    let mut caret = x as f32;
    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        let glyph = glyph_id.with_scale_and_position(px, point(caret, baseline));
        caret += scaled.h_advance(glyph_id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px_x = gx as i32 + bounds.min.x as i32;
                let px_y = gy as i32 + bounds.min.y as i32;
                darken(surface, px_x, px_y, coverage);
            });
        }
    }
}

fn draw_bitmap(surface: &mut GrayImage, px: f32, x: i32, y: i32, text: &str) {
    let scale = bitmap_scale(px);
    let mut caret = x;

    for ch in text.chars() {
        draw_bitmap_glyph(surface, ch, scale, caret, y);
        caret += (BITMAP_W * scale) as i32;
    }
}

/// Blit one Spleen glyph at an integer scale. Characters missing from the
/// font render as a box, matching the classic bitmap-terminal behavior.
fn draw_bitmap_glyph(surface: &mut GrayImage, ch: char, scale: usize, x: i32, y: i32) {
    let mut spleen = match PSF2Font::new(FONT_12X24) {
        Ok(font) => font,
        Err(_) => return,
    };

    let utf8 = ch.to_string();
    let Some(glyph) = spleen.glyph_for_utf8(utf8.as_bytes()) else {
        draw_box(surface, scale, x, y);
        return;
    };

    for (row_y, row) in glyph.enumerate() {
        for (col_x, on) in row.enumerate() {
            if !on || col_x >= BITMAP_W || row_y >= BITMAP_H {
                continue;
            }
            for sy in 0..scale {
                for sx in 0..scale {
                    darken(
                        surface,
                        x + (col_x * scale + sx) as i32,
                        y + (row_y * scale + sy) as i32,
                        1.0,
                    );
                }
            }
        }
    }
}

/// Box outline for characters the bitmap font doesn't cover.
fn draw_box(surface: &mut GrayImage, scale: usize, x: i32, y: i32) {
    let w = (BITMAP_W * scale) as i32;
    let h = (BITMAP_H * scale) as i32;
    for dx in 0..w {
        darken(surface, x + dx, y, 1.0);
        darken(surface, x + dx, y + h - 1, 1.0);
    }
    for dy in 0..h {
        darken(surface, x, y + dy, 1.0);
        darken(surface, x + w - 1, y + dy, 1.0);
    }
}

/// Apply ink coverage to one pixel, clipping out-of-bounds coordinates.
/// Coverage accumulates towards black so overlapping glyphs stay crisp.
fn darken(surface: &mut GrayImage, x: i32, y: i32, coverage: f32) {
    if x < 0 || y < 0 || x >= surface.width() as i32 || y >= surface.height() as i32 {
        return;
    }
    let pixel = &mut surface.get_pixel_mut(x as u32, y as u32).0;
    let ink = (coverage.clamp(0.0, 1.0) * 255.0) as u8;
    pixel[0] = pixel[0].min(255 - ink);
}

/// Largest size (stepping down by 0.5) at which `text` fits `max_width`.
pub fn shrink_to_fit(font: &FontHandle, text: &str, max_width: f32, max_px: f32, min_px: f32) -> f32 {
    let mut size = max_px;
    while size > min_px && measure(font, size, text) > max_width {
        size -= 0.5;
    }
    size.max(min_px)
}

/// Greedy word wrap. A word longer than the line keeps its own line rather
/// than being split mid-word.
pub fn wrap_words(font: &FontHandle, px: f32, text: &str, max_width: f32) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || max_width <= 0.0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in words {
        let tentative = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if current.is_empty() || measure(font, px, &tentative) <= max_width {
            current = tentative;
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Trim a line and append an ellipsis so it fits `max_width`.
pub fn truncate_with_ellipsis(font: &FontHandle, px: f32, line: &str, max_width: f32) -> String {
    if measure(font, px, line) <= max_width {
        return line.to_string();
    }
    let mut kept: String = line.trim_end().to_string();
    while !kept.is_empty() {
        kept.pop();
        let candidate = format!("{}{}", kept.trim_end(), ELLIPSIS);
        if measure(font, px, &candidate) <= max_width {
            return candidate;
        }
    }
    ELLIPSIS.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    fn bitmap() -> FontHandle {
        FontHandle::Bitmap
    }

    #[test]
    fn test_bitmap_measure_is_monospaced() {
        let w1 = measure(&bitmap(), 24.0, "ABC");
        let w2 = measure(&bitmap(), 24.0, "WWW");
        assert_eq!(w1, w2);
        assert_eq!(w1, 36.0);
    }

    #[test]
    fn test_bitmap_scale_quantizes() {
        assert_eq!(line_height(&bitmap(), 24.0), 24);
        assert_eq!(line_height(&bitmap(), 48.0), 48);
        // Sub-24px requests stay at the base size.
        assert_eq!(line_height(&bitmap(), 10.0), 24);
    }

    #[test]
    fn test_draw_marks_pixels() {
        let mut surface = GrayImage::from_pixel(64, 32, image::Luma([255]));
        draw(&mut surface, &bitmap(), 24.0, 2, 2, "A");
        assert!(surface.pixels().any(|p| p.0[0] < 128));
    }

    #[test]
    fn test_draw_clips_out_of_bounds() {
        let mut surface = GrayImage::from_pixel(8, 8, image::Luma([255]));
        draw(&mut surface, &bitmap(), 24.0, -100, -100, "XYZ");
        draw(&mut surface, &bitmap(), 24.0, 100, 100, "XYZ");
    }

    #[test]
    fn test_shrink_to_fit_reduces_size() {
        let size = shrink_to_fit(&bitmap(), "LONG-IDENTIFIER", 60.0, 48.0, 12.0);
        assert!(size < 48.0);
        assert!(size >= 12.0);
    }

    #[test]
    fn test_wrap_words_respects_width() {
        let lines = wrap_words(&bitmap(), 24.0, "one two three four", 72.0);
        // 72px fits 6 monospaced chars per line.
        assert!(lines.len() >= 3);
        for line in &lines {
            assert!(line.chars().count() <= 6 || !line.contains(' '));
        }
    }

    #[test]
    fn test_wrap_words_keeps_overlong_word() {
        let lines = wrap_words(&bitmap(), 24.0, "supercalifragilistic", 36.0);
        assert_eq!(lines, vec!["supercalifragilistic".to_string()]);
    }

    #[test]
    fn test_truncate_appends_ellipsis() {
        let line = truncate_with_ellipsis(&bitmap(), 24.0, "a very long line of text", 96.0);
        assert!(line.ends_with(ELLIPSIS));
        assert!(measure(&bitmap(), 24.0, &line) <= 96.0);
    }

    #[test]
    fn test_truncate_short_line_untouched() {
        let line = truncate_with_ellipsis(&bitmap(), 24.0, "ok", 96.0);
        assert_eq!(line, "ok");
    }
}
