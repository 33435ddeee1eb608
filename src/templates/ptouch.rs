//! Brother P-Touch 24mm continuous tape template.
//!
//! Produces one standalone PNG per label instead of a paged sheet. Each
//! canvas is as wide as the printable area of the tape; its height grows
//! with the content (QR block plus text lines), clamped to sensible tape
//! lengths.

use super::{OptionDomain, OptionSpec, OutputKind, TemplateDescriptor};

pub const DESCRIPTOR: TemplateDescriptor = TemplateDescriptor {
    key: "ptouch",
    label: "Brother P-Touch (24mm tape)",
    kind: OutputKind::ImageBundle,
    options: &[
        OptionSpec {
            name: "detail",
            domain: OptionDomain::Choice(&["full", "minimal"]),
            default: "full",
        },
        OptionSpec {
            name: "copies",
            domain: OptionDomain::Count { min: 1, max: 10 },
            default: "1",
        },
    ],
};

/// Raster resolution of the tape printer.
pub const DPI: f32 = 180.0;

const fn mm_to_px(mm: f32) -> u32 {
    (mm / 25.4 * DPI) as u32
}

/// Printable tape width in pixels (18mm printable area of 24mm tape).
pub const TAPE_WIDTH_PX: u32 = mm_to_px(18.0);

/// Outer margin around the label content.
pub const MARGIN_PX: u32 = mm_to_px(1.5);

/// Gap between the QR block and the text below it.
pub const TEXT_GAP_PX: u32 = mm_to_px(1.0);

/// Shortest and longest label the tape cutter should produce.
pub const MIN_HEIGHT_PX: u32 = mm_to_px(30.0);
pub const MAX_HEIGHT_PX: u32 = mm_to_px(75.0);

/// Identifier line pixel height.
pub const ID_TEXT_PX: f32 = 24.0;

/// Name line pixel height.
pub const BODY_TEXT_PX: f32 = 20.0;

/// Name lines shown before truncation.
pub const MAX_BODY_LINES: usize = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tape_width_matches_18mm_at_180dpi() {
        assert_eq!(TAPE_WIDTH_PX, 127);
    }

    #[test]
    fn test_height_clamp_is_sane() {
        assert!(MIN_HEIGHT_PX < MAX_HEIGHT_PX);
        assert!(MIN_HEIGHT_PX > TAPE_WIDTH_PX);
    }
}
