//! Avery 5163 sheet template: US letter, two columns of five 4"x2" labels.
//!
//! Geometry is expressed in PDF points (72 pt per inch) with the origin at
//! the bottom-left of the page, and converted to pixels at [`DPI`] when a
//! label cell is rasterized.

use super::{OptionDomain, OptionSpec, OutputKind, TemplateDescriptor};

pub const DESCRIPTOR: TemplateDescriptor = TemplateDescriptor {
    key: "avery5163",
    label: "Avery 5163 (2\" x 4\" sheet)",
    kind: OutputKind::Document,
    options: &[
        OptionSpec {
            name: "orientation",
            domain: OptionDomain::Choice(&["horizontal", "vertical", "both"]),
            default: "horizontal",
        },
        OptionSpec {
            name: "copies",
            domain: OptionDomain::Count { min: 1, max: 10 },
            default: "1",
        },
    ],
};

/// US letter in points.
pub const PAGE_SIZE: (f32, f32) = (612.0, 792.0);

pub const LABEL_W: f32 = 4.00 * 72.0;
pub const LABEL_H: f32 = 2.00 * 72.0;
/// Left column (QR + identifier) width within a label.
pub const COL_1_W: f32 = 1.5 * 72.0;

pub const COLS: usize = 2;
pub const ROWS: usize = 5;
pub const SLOTS: usize = ROWS * COLS;

pub const MARGIN_LEFT: f32 = 0.17 * 72.0;
pub const MARGIN_TOP: f32 = 0.50 * 72.0;
pub const H_GAP: f32 = 0.16 * 72.0;
pub const V_GAP: f32 = 0.00 * 72.0;

/// Inner padding of each label cell.
pub const LABEL_PADDING: f32 = 0.1 * 72.0;

/// Raster resolution for label surfaces placed on the PDF page.
pub const DPI: f32 = 300.0;

/// Bottom-left corner of a slot's cell, row-major from the top-left slot.
pub fn cell_origin(slot: usize) -> (f32, f32) {
    let row = slot / COLS;
    let col = slot % COLS;
    let left = MARGIN_LEFT + col as f32 * (LABEL_W + H_GAP);
    let bottom = PAGE_SIZE.1 - MARGIN_TOP - LABEL_H - row as f32 * (LABEL_H + V_GAP);
    (left, bottom)
}

/// Label cell size in pixels at the template's raster resolution.
pub fn cell_px() -> (u32, u32) {
    (
        (LABEL_W / 72.0 * DPI).round() as u32,
        (LABEL_H / 72.0 * DPI).round() as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_fits_on_page() {
        let (left, bottom) = cell_origin(SLOTS - 1);
        assert!(left + LABEL_W <= PAGE_SIZE.0);
        assert!(bottom >= 0.0);
    }

    #[test]
    fn test_cells_are_row_major() {
        let (l0, b0) = cell_origin(0);
        let (l1, b1) = cell_origin(1);
        let (_, b2) = cell_origin(2);
        assert_eq!(b0, b1);
        assert!(l1 > l0);
        assert!(b2 < b0);
    }

    #[test]
    fn test_cell_px_at_300_dpi() {
        assert_eq!(cell_px(), (1200, 600));
    }
}
