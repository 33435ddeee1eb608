//! # Label Rendering
//!
//! Draws one label's visual content (QR code, identifier, display name)
//! onto a grayscale surface. The renderer is deterministic: identical
//! inputs always produce pixel-identical surfaces, so generated sheets are
//! reproducible and byte-comparable in tests.
//!
//! ## Modules
//!
//! - [`qr`]: QR module-grid drawing
//! - [`text`]: outline (ab_glyph) and bitmap (Spleen) text primitives

pub mod qr;
pub mod text;

use image::{imageops, GrayImage, Luma};

use crate::error::LabelError;
use crate::fonts::{FontHandle, FontSet};
use crate::label::ParsedLabel;
use crate::layout::{CanvasPlan, Orientation};
use crate::templates::{avery5163, ptouch, Template};

/// In-memory drawable canvas, one per placement or bundle entry.
pub type Surface = GrayImage;

const WHITE: Luma<u8> = Luma([255]);
const BLACK: Luma<u8> = Luma([0]);

/// Sheet style, in pixels at the sheet's 300 dpi raster resolution.
const SHEET_PAD: u32 = 30;
const SHEET_ID_MAX_PX: f32 = 72.0;
const SHEET_ID_MIN_PX: f32 = 24.0;
const SHEET_BODY_MAX_PX: f32 = 96.0;
const SHEET_BODY_MIN_PX: f32 = 40.0;
const SHEET_DIVIDER_PX: u32 = 2;

/// Render one document-template label cell.
///
/// Vertical labels are composed into swapped dimensions and rotated as a
/// whole, so cell tiling never needs to know about orientation.
pub fn render_document_label(
    template: Template,
    label: &ParsedLabel,
    orientation: Orientation,
    fonts: &FontSet,
) -> Result<Surface, LabelError> {
    match template {
        Template::Avery5163 => {
            let (w, h) = avery5163::cell_px();
            match orientation {
                Orientation::Horizontal => render_sheet_landscape(label, w, h, fonts),
                Orientation::Vertical => {
                    let portrait = render_sheet_portrait(label, h, w, fonts)?;
                    Ok(imageops::rotate90(&portrait))
                }
            }
        }
        Template::PTouch24 => Err(LabelError::Render(
            "tape template has no document cells".to_string(),
        )),
    }
}

/// Render one image-bundle canvas at the exact size the layout planned.
pub fn render_canvas_label(
    plan: &CanvasPlan,
    label: &ParsedLabel,
    minimal: bool,
    fonts: &FontSet,
) -> Result<Surface, LabelError> {
    let mut surface = Surface::from_pixel(plan.width, plan.height, WHITE);
    let pad = ptouch::MARGIN_PX;
    let qr_side = plan.width - 2 * pad;

    qr::draw(&mut surface, &label.record.url, pad, pad, qr_side)?;
    let mut cursor = (pad + qr_side) as i32;

    let max_w = (plan.width - 2 * pad) as f32;

    if label.has_id() {
        cursor += ptouch::TEXT_GAP_PX as i32;
        let size = text::shrink_to_fit(&fonts.id, &label.display_id, max_w, ptouch::ID_TEXT_PX, 12.0);
        let text_w = text::measure(&fonts.id, size, &label.display_id);
        let x = ((plan.width as f32 - text_w) / 2.0).max(0.0) as i32;
        text::draw(&mut surface, &fonts.id, size, x, cursor, &label.display_id);
        cursor += text::line_height(&fonts.id, size) as i32;
    }

    if !minimal && !label.name.is_empty() {
        let lines = text::wrap_words(&fonts.body, ptouch::BODY_TEXT_PX, &label.name, max_w);
        let shown = lines.len().min(ptouch::MAX_BODY_LINES);
        for (index, line) in lines.iter().take(shown).enumerate() {
            cursor += ptouch::TEXT_GAP_PX as i32;
            let rendered = if index + 1 == shown && lines.len() > shown {
                text::truncate_with_ellipsis(&fonts.body, ptouch::BODY_TEXT_PX, line, max_w)
            } else {
                line.clone()
            };
            text::draw(
                &mut surface,
                &fonts.body,
                ptouch::BODY_TEXT_PX,
                pad as i32,
                cursor,
                &rendered,
            );
            cursor += text::line_height(&fonts.body, ptouch::BODY_TEXT_PX) as i32;
        }
    }

    Ok(surface)
}

/// Two-column layout: QR and identifier on the left, name on the right.
fn render_sheet_landscape(
    label: &ParsedLabel,
    w: u32,
    h: u32,
    fonts: &FontSet,
) -> Result<Surface, LabelError> {
    let mut surface = Surface::from_pixel(w, h, WHITE);
    let col1 = (avery5163::COL_1_W / 72.0 * avery5163::DPI).round() as u32;
    let pad = SHEET_PAD;

    let qr_side = col1 - 2 * pad;
    qr::draw(&mut surface, &label.record.url, pad, pad, qr_side)?;

    if label.has_id() {
        let max_w = (col1 - 2 * pad) as f32;
        let size = text::shrink_to_fit(
            &fonts.id,
            &label.display_id,
            max_w,
            SHEET_ID_MAX_PX,
            SHEET_ID_MIN_PX,
        );
        let text_w = text::measure(&fonts.id, size, &label.display_id);
        let line_h = text::line_height(&fonts.id, size) as i32;
        let region_top = (pad + qr_side) as i32;
        let region_h = h as i32 - region_top;
        let x = ((col1 as f32 - text_w) / 2.0).max(0.0) as i32;
        let y = region_top + (region_h - line_h).max(0) / 2;
        text::draw(&mut surface, &fonts.id, size, x, y, &label.display_id);
    }

    fill_rect(&mut surface, col1, 0, SHEET_DIVIDER_PX, h);

    let text_x = col1 + SHEET_DIVIDER_PX + pad;
    let max_w = (w - text_x - pad) as f32;
    draw_name_block(
        &mut surface,
        &fonts.body,
        &label.name,
        text_x as i32,
        pad as i32,
        max_w,
        h - 2 * pad,
        SHEET_BODY_MAX_PX,
        SHEET_BODY_MIN_PX,
    );

    Ok(surface)
}

/// Stacked layout used for vertical sheet labels: QR, identifier, name.
fn render_sheet_portrait(
    label: &ParsedLabel,
    w: u32,
    h: u32,
    fonts: &FontSet,
) -> Result<Surface, LabelError> {
    let mut surface = Surface::from_pixel(w, h, WHITE);
    let pad = SHEET_PAD;

    let qr_side = w - 2 * pad;
    qr::draw(&mut surface, &label.record.url, pad, pad, qr_side)?;
    let mut cursor = (pad + qr_side + pad) as i32;

    if label.has_id() {
        let max_w = (w - 2 * pad) as f32;
        let size = text::shrink_to_fit(
            &fonts.id,
            &label.display_id,
            max_w,
            SHEET_ID_MAX_PX,
            SHEET_ID_MIN_PX,
        );
        let text_w = text::measure(&fonts.id, size, &label.display_id);
        let x = ((w as f32 - text_w) / 2.0).max(0.0) as i32;
        text::draw(&mut surface, &fonts.id, size, x, cursor, &label.display_id);
        cursor += text::line_height(&fonts.id, size) as i32 + pad as i32;
    }

    let avail_h = (h as i32 - cursor - pad as i32).max(0) as u32;
    draw_name_block(
        &mut surface,
        &fonts.body,
        &label.name,
        pad as i32,
        cursor,
        (w - 2 * pad) as f32,
        avail_h,
        SHEET_BODY_MAX_PX,
        SHEET_BODY_MIN_PX,
    );

    Ok(surface)
}

/// Draw a wrapped, vertically centered name block, shrinking the font until
/// the text fits and truncating the last visible line when it still can't.
#[allow(clippy::too_many_arguments)]
fn draw_name_block(
    surface: &mut Surface,
    font: &FontHandle,
    name: &str,
    x: i32,
    y: i32,
    max_w: f32,
    avail_h: u32,
    max_px: f32,
    min_px: f32,
) {
    if name.is_empty() || avail_h == 0 {
        return;
    }

    let mut size = max_px;
    let mut lines;
    loop {
        lines = text::wrap_words(font, size, name, max_w);
        let needed = lines.len() as u32 * text::line_height(font, size);
        if needed <= avail_h || size <= min_px {
            break;
        }
        size = (size - 4.0).max(min_px);
    }

    let line_h = text::line_height(font, size).max(1);
    let max_lines = (avail_h / line_h).max(1) as usize;
    let shown = lines.len().min(max_lines);
    let block_h = shown as u32 * line_h;
    let mut cursor = y + (avail_h.saturating_sub(block_h) / 2) as i32;

    for (index, line) in lines.iter().take(shown).enumerate() {
        let rendered = if index + 1 == shown && lines.len() > shown {
            text::truncate_with_ellipsis(font, size, line, max_w)
        } else {
            line.clone()
        };
        text::draw(surface, font, size, x, cursor, &rendered);
        cursor += line_h as i32;
    }
}

fn fill_rect(surface: &mut Surface, x: u32, y: u32, w: u32, h: u32) {
    for yy in y..(y + h).min(surface.height()) {
        for xx in x..(x + w).min(surface.width()) {
            surface.put_pixel(xx, yy, BLACK);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{LabelPattern, Record};

    fn label(name: &str) -> ParsedLabel {
        LabelPattern::default().parse(&Record::new(
            "loc-1",
            name,
            "https://homebox.test/location/loc-1",
        ))
    }

    #[test]
    fn test_sheet_label_matches_cell_size() {
        let fonts = FontSet::builtin();
        let surface = render_document_label(
            Template::Avery5163,
            &label("BOX.001 | Tools"),
            Orientation::Horizontal,
            &fonts,
        )
        .unwrap();
        assert_eq!((surface.width(), surface.height()), avery5163::cell_px());
    }

    #[test]
    fn test_vertical_label_matches_cell_size_after_rotation() {
        let fonts = FontSet::builtin();
        let surface = render_document_label(
            Template::Avery5163,
            &label("BOX.001 | Tools"),
            Orientation::Vertical,
            &fonts,
        )
        .unwrap();
        assert_eq!((surface.width(), surface.height()), avery5163::cell_px());
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let fonts = FontSet::builtin();
        let entry = label("RACK.5 | Shelf A");
        let a = render_document_label(Template::Avery5163, &entry, Orientation::Horizontal, &fonts)
            .unwrap();
        let b = render_document_label(Template::Avery5163, &entry, Orientation::Horizontal, &fonts)
            .unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_label_without_identifier_still_renders() {
        let fonts = FontSet::builtin();
        let surface = render_document_label(
            Template::Avery5163,
            &label("no id here"),
            Orientation::Horizontal,
            &fonts,
        )
        .unwrap();
        // QR ink is present even with a blank identifier.
        assert!(surface.pixels().any(|p| p.0[0] == 0));
    }

    #[test]
    fn test_canvas_label_exact_size() {
        let fonts = FontSet::builtin();
        let plan = CanvasPlan {
            label: 0,
            copy: 0,
            width: ptouch::TAPE_WIDTH_PX,
            height: ptouch::MIN_HEIGHT_PX,
        };
        let surface = render_canvas_label(&plan, &label("BOX.001 | Tools"), false, &fonts).unwrap();
        assert_eq!(surface.width(), ptouch::TAPE_WIDTH_PX);
        assert_eq!(surface.height(), ptouch::MIN_HEIGHT_PX);
    }
}
