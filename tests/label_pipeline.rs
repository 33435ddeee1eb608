//! # Pipeline Tests
//!
//! End-to-end checks of the label pipeline: parsing, option resolution,
//! layout, rendering and output assembly, driven through the public API
//! with the built-in bitmap font so no files or network are needed.

use std::collections::HashMap;
use std::io::Cursor;

use pretty_assertions::assert_eq;

use etiqueta::fonts::FontSet;
use etiqueta::label::{LabelPattern, Record};
use etiqueta::layout::{self, LayoutPlan};
use etiqueta::pipeline::{self, RenderRequest};
use etiqueta::templates::{OutputKind, Template};
use etiqueta::LabelError;

/// The scenario records used across the spec-level tests.
fn scenario_records() -> Vec<Record> {
    vec![
        Record::new("a1", "BOX.001 | Tools", "https://homebox.test/location/a1"),
        Record::new("a2", "RACK.5 | Shelf A", "https://homebox.test/location/a2"),
        Record::new("a3", "no id here", "https://homebox.test/location/a3"),
    ]
}

fn request(template: &str, options: &[(&str, &str)]) -> RenderRequest {
    let mut request = RenderRequest::new(template);
    request.options = options
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    request
}

#[test]
fn scenario_sheet_defaults_single_page() {
    let pattern = LabelPattern::default();
    let labels = pattern.parse_all(&scenario_records());

    assert_eq!(labels[0].display_id, "BOX.001");
    assert_eq!(labels[1].display_id, "RACK.005");
    assert_eq!(labels[2].display_id, "");
    assert_eq!(labels[2].name, "no id here");

    let options = Template::Avery5163.resolve_options(&HashMap::new());
    let plan = layout::plan(
        Template::Avery5163,
        &labels,
        &options,
        0,
        &FontSet::builtin(),
    )
    .unwrap();

    let LayoutPlan::Document {
        placements,
        page_count,
        ..
    } = plan
    else {
        panic!("expected a document plan");
    };
    assert_eq!(placements.len(), 3);
    assert_eq!(page_count, 1);

    let output = pipeline::generate(
        &scenario_records(),
        &request("avery5163", &[]),
        &LabelPattern::default(),
        &FontSet::builtin(),
    )
    .unwrap();
    assert_eq!(output.kind, OutputKind::Document);
    assert!(output.bytes.starts_with(b"%PDF"));
}

#[test]
fn sheet_placement_count_is_labels_times_copies_times_orientations() {
    let pattern = LabelPattern::default();
    let labels = pattern.parse_all(&scenario_records());
    let options = Template::Avery5163.resolve_options(
        &[("copies", "2"), ("orientation", "both")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    );

    let plan = layout::plan(
        Template::Avery5163,
        &labels,
        &options,
        0,
        &FontSet::builtin(),
    )
    .unwrap();
    let LayoutPlan::Document { placements, .. } = plan else {
        panic!("expected a document plan");
    };

    // 3 labels x 2 copies x 2 orientations
    assert_eq!(placements.len(), 12);

    // Row-major tiling never reuses a cell on one page.
    let mut seen: Vec<(usize, i64, i64)> = Vec::new();
    for placement in &placements {
        let key = (
            placement.page,
            placement.rect.x.round() as i64,
            placement.rect.y.round() as i64,
        );
        assert!(!seen.contains(&key), "cell reused: {key:?}");
        seen.push(key);
    }
}

#[test]
fn bundle_rendering_is_deterministic() {
    let records = scenario_records();
    let pattern = LabelPattern::default();
    let fonts = FontSet::builtin();
    let req = request("ptouch", &[("copies", "2")]);

    let first = pipeline::generate(&records, &req, &pattern, &fonts).unwrap();
    let second = pipeline::generate(&records, &req, &pattern, &fonts).unwrap();

    assert_eq!(first.bytes, second.bytes);
    assert_eq!(first.filename, second.filename);
}

#[test]
fn bundle_entry_names_are_unique_and_stable() {
    let output = pipeline::generate(
        &scenario_records(),
        &request("ptouch", &[("copies", "2")]),
        &LabelPattern::default(),
        &FontSet::builtin(),
    )
    .unwrap();
    assert_eq!(output.kind, OutputKind::ImageBundle);
    assert_eq!(output.mime(), "application/zip");

    let mut archive = zip::ZipArchive::new(Cursor::new(output.bytes)).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();

    assert_eq!(
        names,
        vec![
            "BOX.001.png",
            "BOX.001-2.png",
            "RACK.005.png",
            "RACK.005-2.png",
            "label-05.png",
            "label-06.png",
        ]
    );
}

#[test]
fn bundle_entries_are_valid_pngs() {
    let output = pipeline::generate(
        &scenario_records(),
        &request("ptouch", &[]),
        &LabelPattern::default(),
        &FontSet::builtin(),
    )
    .unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(output.bytes)).unwrap();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).unwrap();
        let mut bytes = Vec::new();
        std::io::Read::read_to_end(&mut entry, &mut bytes).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(decoded.width() > 0);
    }
}

#[test]
fn empty_input_yields_valid_outputs() {
    let pdf = pipeline::generate(
        &[],
        &request("avery5163", &[]),
        &LabelPattern::default(),
        &FontSet::builtin(),
    )
    .unwrap();
    assert!(pdf.bytes.starts_with(b"%PDF"));

    let bundle = pipeline::generate(
        &[],
        &request("ptouch", &[]),
        &LabelPattern::default(),
        &FontSet::builtin(),
    )
    .unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(bundle.bytes)).unwrap();
    assert_eq!(archive.len(), 0);
}

#[test]
fn unknown_template_fails_before_rendering() {
    let err = pipeline::generate(
        &scenario_records(),
        &request("cassette", &[]),
        &LabelPattern::default(),
        &FontSet::builtin(),
    )
    .unwrap_err();
    assert!(matches!(err, LabelError::TemplateNotFound { .. }));
}

#[test]
fn out_of_range_options_fall_back_to_defaults() {
    let options = Template::PTouch24.resolve_options(
        &[("detail", "everything"), ("copies", "0")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    );
    assert_eq!(options.choice("detail"), "full");
    assert_eq!(options.count("copies"), 1);
}

#[test]
fn skip_is_rejected_for_bundle_templates() {
    let mut req = request("ptouch", &[]);
    req.skip = 2;
    let err = pipeline::generate(
        &scenario_records(),
        &req,
        &LabelPattern::default(),
        &FontSet::builtin(),
    )
    .unwrap_err();
    assert!(matches!(err, LabelError::Config(_)));
}

#[test]
fn skip_pushes_labels_onto_a_second_page() {
    let pattern = LabelPattern::default();
    let labels = pattern.parse_all(&scenario_records());
    let options = Template::Avery5163.resolve_options(&HashMap::new());

    let plan = layout::plan(
        Template::Avery5163,
        &labels,
        &options,
        9,
        &FontSet::builtin(),
    )
    .unwrap();
    let LayoutPlan::Document {
        placements,
        page_count,
        ..
    } = plan
    else {
        panic!("expected a document plan");
    };

    // One label lands in the last cell of page one, the rest flow over.
    assert_eq!(placements[0].page, 0);
    assert_eq!(placements[1].page, 1);
    assert_eq!(page_count, 2);
}
