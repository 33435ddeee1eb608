//! # Output Assembly
//!
//! Collects rendered label surfaces into the template's declared output
//! shape: a paginated PDF for sheet templates, or a ZIP of standalone PNGs
//! for tape templates. Archive entries carry a pinned modification time so
//! re-running with identical input produces byte-identical output.

use std::io::{Cursor, Write};

use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::LabelError;
use crate::label::ParsedLabel;
use crate::layout::{CanvasPlan, Placement};
use crate::render::Surface;
use crate::templates::OutputKind;

/// Final render product handed back to the caller.
#[derive(Debug, Clone)]
pub struct Output {
    pub bytes: Vec<u8>,
    pub kind: OutputKind,
    pub filename: String,
}

impl Output {
    pub fn mime(&self) -> &'static str {
        self.kind.mime()
    }
}

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt / 72.0 * 25.4)
}

/// Concatenate per-placement surfaces into one paginated PDF.
///
/// Surfaces arrive in placement order and are embedded as image XObjects at
/// their placement rectangles. An empty plan still yields a valid document
/// with a single blank page.
pub fn assemble_document(
    title: &str,
    page_size: (f32, f32),
    page_count: usize,
    placed: Vec<(Placement, Surface)>,
    dpi: f32,
    filename: String,
) -> Result<Output, LabelError> {
    let page_w = pt_to_mm(page_size.0);
    let page_h = pt_to_mm(page_size.1);

    let mut doc = PdfDocument::new(title);

    let mut pages: Vec<PdfPage> = Vec::new();
    for page_index in 0..page_count {
        let mut ops: Vec<Op> = Vec::new();

        for (placement, surface) in placed.iter().filter(|(p, _)| p.page == page_index) {
            let img_w = surface.width() as usize;
            let img_h = surface.height() as usize;
            let rgb = image::DynamicImage::ImageLuma8(surface.clone()).to_rgb8();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: img_w,
                height: img_h,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            // Native size at the raster dpi; scale corrects px rounding so
            // the image covers the placement rectangle exactly.
            let native_w_pt = img_w as f32 / dpi * 72.0;
            let native_h_pt = img_h as f32 / dpi * 72.0;
            ops.push(Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(placement.rect.x)),
                    translate_y: Some(Pt(placement.rect.y)),
                    scale_x: Some(placement.rect.w / native_w_pt),
                    scale_y: Some(placement.rect.h / native_h_pt),
                    dpi: Some(dpi),
                    rotate: None,
                },
            });
        }

        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    doc.with_pages(pages);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);

    tracing::debug!(
        pages = page_count.max(1),
        surfaces = placed.len(),
        bytes = bytes.len(),
        "assembled PDF"
    );

    Ok(Output {
        bytes,
        kind: OutputKind::Document,
        filename,
    })
}

/// Package per-canvas surfaces into a ZIP of PNG files.
///
/// Entry names come from the label's identifier, with a positional
/// fallback for labels without one and numeric suffixes on collision, so
/// archive contents are stable across re-runs.
pub fn assemble_bundle(
    labels: &[ParsedLabel],
    canvases: &[CanvasPlan],
    surfaces: Vec<Surface>,
    filename: String,
) -> Result<Output, LabelError> {
    let names = entry_names(labels, canvases);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    for (name, surface) in names.iter().zip(surfaces) {
        let mut png = Vec::new();
        surface
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| LabelError::Render(format!("PNG encoding failed: {e}")))?;

        writer
            .start_file(name.as_str(), options.clone())
            .map_err(|e| LabelError::Render(format!("archive write failed: {e}")))?;
        writer
            .write_all(&png)
            .map_err(|e| LabelError::Render(format!("archive write failed: {e}")))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| LabelError::Render(format!("archive finalization failed: {e}")))?;

    Ok(Output {
        bytes: cursor.into_inner(),
        kind: OutputKind::ImageBundle,
        filename,
    })
}

/// Deterministic, collision-free PNG entry names for a bundle plan.
fn entry_names(labels: &[ParsedLabel], canvases: &[CanvasPlan]) -> Vec<String> {
    let mut used: Vec<String> = Vec::new();
    let mut names = Vec::with_capacity(canvases.len());

    for (position, canvas) in canvases.iter().enumerate() {
        let stem = labels
            .get(canvas.label)
            .filter(|label| label.has_id())
            .map(|label| sanitize(&label.display_id))
            .unwrap_or_else(|| format!("label-{:02}", position + 1));

        let mut candidate = stem.clone();
        let mut suffix = 2;
        while used.contains(&candidate) {
            candidate = format!("{stem}-{suffix}");
            suffix += 1;
        }
        used.push(candidate.clone());
        names.push(format!("{candidate}.png"));
    }

    names
}

/// Restrict archive entry names to a portable character set.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                ch
            } else {
                '-'
            }
        })
        .collect()
}
