//! Static file serving for the frontend.

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
};
use include_dir::{include_dir, Dir};

/// Embedded frontend files.
static FRONTEND: Dir = include_dir!("$CARGO_MANIFEST_DIR/web");

/// Serve the index.html file.
pub async fn index_handler() -> impl IntoResponse {
    match FRONTEND.get_file("index.html") {
        Some(file) => Html(file.contents().to_vec()).into_response(),
        None => (StatusCode::NOT_FOUND, "Frontend not built").into_response(),
    }
}

/// Serve static assets from the embedded web directory.
pub async fn asset_handler(Path(path): Path<String>) -> impl IntoResponse {
    // Strip query params if present
    let clean_path = path.split('?').next().unwrap_or(&path);

    match FRONTEND.get_file(clean_path) {
        Some(file) => {
            let mime = mime_guess::from_path(clean_path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.to_string())],
                file.contents().to_vec(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}
