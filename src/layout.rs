//! # Layout Engine
//!
//! Computes where every label instance goes before anything is drawn.
//!
//! Document templates tile fixed-size cells across pages in row-major
//! order; an option asking for multiple copies or both orientations expands
//! a label into consecutive placements. Cell geometry stays
//! orientation-agnostic: a vertical label occupies the same cell and is
//! rotated at render time.
//!
//! Image-bundle templates get one canvas per (label x copy), sized from the
//! tape width and the measured content height.

use crate::error::LabelError;
use crate::fonts::FontSet;
use crate::label::ParsedLabel;
use crate::render::text;
use crate::templates::{avery5163, ptouch, OptionValues, Template};

/// Content rotation applied when the label is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Axis-aligned rectangle in PDF points, origin at the page's bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPt {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// One renderable label instance on a document page.
#[derive(Debug, Clone)]
pub struct Placement {
    /// Index into the request's parsed-label list
    pub label: usize,
    pub copy: u32,
    pub orientation: Orientation,
    pub page: usize,
    pub rect: RectPt,
}

/// One standalone canvas in an image bundle.
#[derive(Debug, Clone)]
pub struct CanvasPlan {
    pub label: usize,
    pub copy: u32,
    pub width: u32,
    pub height: u32,
}

/// The layout engine's output: placements plus target surface dimensions.
#[derive(Debug, Clone)]
pub enum LayoutPlan {
    Document {
        page_size: (f32, f32),
        page_count: usize,
        placements: Vec<Placement>,
    },
    Bundle {
        canvases: Vec<CanvasPlan>,
    },
}

/// Compute the layout for one render request.
///
/// `skip` leaves that many leading cells of the first sheet empty (for
/// partially used label sheets); it is rejected for bundle templates,
/// which have no sheet to skip into.
pub fn plan(
    template: Template,
    labels: &[ParsedLabel],
    options: &OptionValues,
    skip: usize,
    fonts: &FontSet,
) -> Result<LayoutPlan, LabelError> {
    match template {
        Template::Avery5163 => Ok(plan_sheet(labels, options, skip)),
        Template::PTouch24 => {
            if skip > 0 {
                return Err(LabelError::Config(
                    "skip is not compatible with image-bundle templates".to_string(),
                ));
            }
            Ok(plan_tape(labels, options, fonts))
        }
    }
}

/// Orientations requested by the `orientation` option, in placement order.
fn requested_orientations(options: &OptionValues) -> Vec<Orientation> {
    match options.choice("orientation") {
        "vertical" => vec![Orientation::Vertical],
        "both" => vec![Orientation::Horizontal, Orientation::Vertical],
        _ => vec![Orientation::Horizontal],
    }
}

fn plan_sheet(labels: &[ParsedLabel], options: &OptionValues, skip: usize) -> LayoutPlan {
    let orientations = requested_orientations(options);
    let copies = options.count("copies");

    let mut placements = Vec::new();
    let mut slot = skip;

    for (index, _label) in labels.iter().enumerate() {
        for &orientation in &orientations {
            for copy in 0..copies {
                let page = slot / avery5163::SLOTS;
                let cell = slot % avery5163::SLOTS;
                let (x, y) = avery5163::cell_origin(cell);
                placements.push(Placement {
                    label: index,
                    copy,
                    orientation,
                    page,
                    rect: RectPt {
                        x,
                        y,
                        w: avery5163::LABEL_W,
                        h: avery5163::LABEL_H,
                    },
                });
                slot += 1;
            }
        }
    }

    let page_count = placements.last().map(|p| p.page + 1).unwrap_or(0);

    LayoutPlan::Document {
        page_size: avery5163::PAGE_SIZE,
        page_count,
        placements,
    }
}

fn plan_tape(labels: &[ParsedLabel], options: &OptionValues, fonts: &FontSet) -> LayoutPlan {
    let copies = options.count("copies");
    let minimal = options.choice("detail") == "minimal";

    let width = ptouch::TAPE_WIDTH_PX;
    let text_width = (width - 2 * ptouch::MARGIN_PX) as f32;

    let mut canvases = Vec::new();
    for (index, label) in labels.iter().enumerate() {
        let qr_side = width - 2 * ptouch::MARGIN_PX;

        let mut height = ptouch::MARGIN_PX + qr_side + ptouch::MARGIN_PX;
        if label.has_id() {
            height += ptouch::TEXT_GAP_PX + text::line_height(&fonts.id, ptouch::ID_TEXT_PX);
        }
        if !minimal && !label.name.is_empty() {
            let lines = text::wrap_words(&fonts.body, ptouch::BODY_TEXT_PX, &label.name, text_width);
            let shown = lines.len().min(ptouch::MAX_BODY_LINES) as u32;
            height += shown
                * (ptouch::TEXT_GAP_PX + text::line_height(&fonts.body, ptouch::BODY_TEXT_PX));
        }

        let height = height.clamp(ptouch::MIN_HEIGHT_PX, ptouch::MAX_HEIGHT_PX);

        for copy in 0..copies {
            canvases.push(CanvasPlan {
                label: index,
                copy,
                width,
                height,
            });
        }
    }

    LayoutPlan::Bundle { canvases }
}
