//! JSON API handlers for the label picker frontend.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api;
use crate::error::LabelError;
use crate::pipeline::{self, RenderRequest};
use crate::templates::{OptionDomain, Template};

use super::state::AppState;

/// Which Homebox collection a request addresses.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    #[default]
    Locations,
    Assets,
}

impl RecordKind {
    fn output_stem(&self) -> &'static str {
        match self {
            RecordKind::Locations => "locations",
            RecordKind::Assets => "assets",
        }
    }
}

#[derive(Deserialize)]
pub struct RecordsQuery {
    #[serde(default)]
    kind: RecordKind,
    #[serde(default)]
    name_pattern: Option<String>,
}

#[derive(Serialize)]
pub struct RecordRow {
    id: String,
    display_id: String,
    name: String,
}

/// Handle GET /api/records - list selectable records with parsed ids.
pub async fn records(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<Vec<RecordRow>>, (StatusCode, String)> {
    let records = fetch_records(&state, query.kind, query.name_pattern.as_deref())
        .await
        .map_err(error_response)?;

    let rows = state
        .pattern
        .parse_all(&records)
        .into_iter()
        .map(|label| RecordRow {
            id: label.record.id.clone(),
            display_id: label.display_id,
            name: label.name,
        })
        .collect();

    Ok(Json(rows))
}

#[derive(Serialize)]
pub struct OptionRow {
    name: &'static str,
    default: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<u32>,
}

#[derive(Serialize)]
pub struct TemplateRow {
    key: &'static str,
    label: &'static str,
    kind: &'static str,
    options: Vec<OptionRow>,
}

/// Handle GET /api/templates - template choices and their option specs,
/// used by the frontend to render choosers.
pub async fn templates() -> Json<Vec<TemplateRow>> {
    let rows = Template::ALL
        .iter()
        .map(|template| {
            let descriptor = template.descriptor();
            TemplateRow {
                key: descriptor.key,
                label: descriptor.label,
                kind: match descriptor.kind {
                    crate::templates::OutputKind::Document => "document",
                    crate::templates::OutputKind::ImageBundle => "image-bundle",
                },
                options: template
                    .available_options()
                    .iter()
                    .map(|spec| match spec.domain {
                        OptionDomain::Choice(values) => OptionRow {
                            name: spec.name,
                            default: spec.default,
                            values: Some(values.to_vec()),
                            min: None,
                            max: None,
                        },
                        OptionDomain::Count { min, max } => OptionRow {
                            name: spec.name,
                            default: spec.default,
                            values: None,
                            min: Some(min),
                            max: Some(max),
                        },
                    })
                    .collect(),
            }
        })
        .collect();
    Json(rows)
}

#[derive(Deserialize)]
pub struct GenerateRequest {
    template: String,
    #[serde(default)]
    kind: RecordKind,
    /// Selected record ids; empty means "everything that matched".
    #[serde(default)]
    ids: Vec<String>,
    #[serde(default)]
    options: HashMap<String, String>,
    #[serde(default)]
    skip: usize,
    #[serde(default)]
    name_pattern: Option<String>,
}

/// Handle POST /api/generate - run the pipeline and return the artifact
/// as a download.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    let records = match fetch_records(&state, request.kind, request.name_pattern.as_deref()).await
    {
        Ok(records) => records,
        Err(err) => return error_response(err).into_response(),
    };

    let records = if request.ids.is_empty() {
        records
    } else {
        api::select_records(&records, &request.ids)
    };

    let render_request = RenderRequest {
        template: request.template,
        options: request.options,
        skip: request.skip,
        output_stem: request.kind.output_stem().to_string(),
    };
    let pattern = state.pattern.clone();

    // Rendering is synchronous and may lazily fetch a font on first use;
    // keep it off the async workers.
    let result = tokio::task::spawn_blocking(move || {
        pipeline::generate_with_global_fonts(&records, &render_request, &pattern)
    })
    .await;

    match result {
        Ok(Ok(output)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, output.mime().to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", output.filename),
                ),
            ],
            output.bytes,
        )
            .into_response(),
        Ok(Err(err)) => error_response(err).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Render task failed: {err}"),
        )
            .into_response(),
    }
}

async fn fetch_records(
    state: &AppState,
    kind: RecordKind,
    name_pattern: Option<&str>,
) -> Result<Vec<crate::label::Record>, LabelError> {
    let filter = match name_pattern.map(str::trim).filter(|p| !p.is_empty()) {
        Some(pattern) => Some(api::compile_name_filter(pattern)?),
        None => None,
    };

    match kind {
        RecordKind::Locations => {
            let locations = state.client.list_locations().await?;
            Ok(api::location_records(
                &locations,
                state.client.base_url(),
                filter.as_ref(),
                &state.pattern,
            ))
        }
        RecordKind::Assets => {
            let items = state.client.list_items().await?;
            Ok(api::item_records(
                &items,
                state.client.base_url(),
                filter.as_ref(),
                &state.pattern,
            ))
        }
    }
}

/// Map pipeline errors onto HTTP statuses: unknown template and bad input
/// are client errors, everything else is a 500.
fn error_response(err: LabelError) -> (StatusCode, String) {
    let status = match &err {
        LabelError::TemplateNotFound { .. } => StatusCode::NOT_FOUND,
        LabelError::Config(_) | LabelError::Pattern(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}
