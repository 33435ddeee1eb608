//! # Render Pipeline
//!
//! One render invocation: raw records in, print-ready bytes out. The
//! pipeline is synchronous and request-scoped; any unrecoverable error
//! aborts the whole render, so the caller receives either a complete
//! output or a single explicit failure, never a truncated artifact.

use std::collections::HashMap;

use crate::error::LabelError;
use crate::fonts::{FontSet, FontStore};
use crate::label::{LabelPattern, Record};
use crate::layout::{self, LayoutPlan};
use crate::output::{self, Output};
use crate::render;
use crate::templates::{avery5163, Template};

/// One render request as supplied by the collaborator (web form or CLI).
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Template key, resolved against the registry
    pub template: String,
    /// Raw option strings; the registry parses and defaults them
    pub options: HashMap<String, String>,
    /// Leading cells to leave empty on the first sheet
    pub skip: usize,
    /// Output filename without extension
    pub output_stem: String,
}

impl RenderRequest {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            options: HashMap::new(),
            skip: 0,
            output_stem: "labels".to_string(),
        }
    }
}

/// Run the full pipeline for one request.
pub fn generate(
    records: &[Record],
    request: &RenderRequest,
    pattern: &LabelPattern,
    fonts: &FontSet,
) -> Result<Output, LabelError> {
    // Template resolution happens before any parsing or rendering so an
    // unknown key fails fast with no partial work.
    let template = Template::lookup(&request.template)?;
    let options = template.resolve_options(&request.options);
    let labels = pattern.parse_all(records);

    tracing::debug!(
        template = template.key(),
        labels = labels.len(),
        skip = request.skip,
        "starting render"
    );

    let filename = format!("{}.{}", request.output_stem, template.kind().extension());
    let plan = layout::plan(template, &labels, &options, request.skip, fonts)?;

    match plan {
        LayoutPlan::Document {
            page_size,
            page_count,
            placements,
        } => {
            let mut placed = Vec::with_capacity(placements.len());
            for placement in placements {
                let surface = render::render_document_label(
                    template,
                    &labels[placement.label],
                    placement.orientation,
                    fonts,
                )?;
                placed.push((placement, surface));
            }
            output::assemble_document(
                &request.output_stem,
                page_size,
                page_count,
                placed,
                avery5163::DPI,
                filename,
            )
        }
        LayoutPlan::Bundle { canvases } => {
            let minimal = options.choice("detail") == "minimal";
            let mut surfaces = Vec::with_capacity(canvases.len());
            for canvas in &canvases {
                surfaces.push(render::render_canvas_label(
                    canvas,
                    &labels[canvas.label],
                    minimal,
                    fonts,
                )?);
            }
            output::assemble_bundle(&labels, &canvases, surfaces, filename)
        }
    }
}

/// [`generate`] with fonts resolved from the process-wide store.
pub fn generate_with_global_fonts(
    records: &[Record],
    request: &RenderRequest,
    pattern: &LabelPattern,
) -> Result<Output, LabelError> {
    let fonts = FontStore::global().font_set();
    generate(records, request, pattern, &fonts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::OutputKind;

    fn records(names: &[&str]) -> Vec<Record> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Record::new(
                    format!("id-{i}"),
                    *name,
                    format!("https://homebox.test/location/id-{i}"),
                )
            })
            .collect()
    }

    #[test]
    fn test_unknown_template_fails_before_rendering() {
        let err = generate(
            &records(&["BOX.1 | a"]),
            &RenderRequest::new("bogus"),
            &LabelPattern::default(),
            &FontSet::builtin(),
        )
        .unwrap_err();
        assert!(matches!(err, LabelError::TemplateNotFound { .. }));
    }

    #[test]
    fn test_sheet_request_produces_pdf() {
        let output = generate(
            &records(&["BOX.001 | Tools", "RACK.5 | Shelf A", "no id here"]),
            &RenderRequest::new("avery5163"),
            &LabelPattern::default(),
            &FontSet::builtin(),
        )
        .unwrap();
        assert_eq!(output.kind, OutputKind::Document);
        assert_eq!(output.filename, "labels.pdf");
        assert_eq!(output.mime(), "application/pdf");
        assert!(output.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_empty_input_produces_valid_output() {
        let output = generate(
            &[],
            &RenderRequest::new("ptouch"),
            &LabelPattern::default(),
            &FontSet::builtin(),
        )
        .unwrap();
        assert_eq!(output.kind, OutputKind::ImageBundle);
        assert!(!output.bytes.is_empty());
    }
}
