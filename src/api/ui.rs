//! Embedded browser UI
//!
//! The page is compiled into the binary; in development it falls back to
//! serving from the `ui/` directory.

use axum::{
    body::Body,
    extract::Path,
    http::{header, Response, StatusCode},
    response::IntoResponse,
};
use rust_embed::Embed;
use std::path::PathBuf;

#[derive(Embed)]
#[folder = "ui"]
struct UiFiles;

fn file_response(path: &str, content: Vec<u8>) -> Response<Body> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime.as_ref().to_string())],
        content,
    )
        .into_response()
}

/// Serve embedded static files, with filesystem fallback for development
pub async fn serve_static(Path(path): Path<String>) -> Response<Body> {
    let path = path.trim_start_matches('/');

    if let Some(content) = UiFiles::get(path) {
        return file_response(path, content.data.into_owned());
    }

    let fs_path = PathBuf::from("ui").join(path);
    if !path.contains("..") {
        if let Ok(content) = std::fs::read(&fs_path) {
            return file_response(path, content);
        }
    }

    (StatusCode::NOT_FOUND, "Not found").into_response()
}

/// Get the index.html content (embedded or from filesystem)
pub fn get_index_html() -> Option<String> {
    if let Some(content) = UiFiles::get("index.html") {
        return String::from_utf8(content.data.into_owned()).ok();
    }

    std::fs::read_to_string("ui/index.html").ok()
}
