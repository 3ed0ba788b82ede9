//! Static file serving.
//!
//! The "next handler" behind the virtual router: files are served from the
//! project root so source assets (scripts, styles, images) resolve during
//! development.

use std::path::Path;

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;

/// Serve a file from the project root, if one exists at the request path.
///
/// Returns `None` (letting the chain continue) for the bare `/`, for paths
/// escaping the root, and for anything that is not a regular file.
pub(crate) async fn serve_from_root(root: &Path, path: &str) -> Option<Response> {
    let relative = path.trim_start_matches('/');
    if relative.is_empty() || relative.split('/').any(|segment| segment == "..") {
        return None;
    }

    let file = root.join(relative);
    if !file.is_file() {
        return None;
    }

    let content = tokio::fs::read(&file).await.ok()?;
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime_for(&file))
        .body(Body::from(content))
        .ok()
}

/// Content type from a file extension.
fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|extension| extension.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("js" | "mjs") => "text/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("ico") => "image/x-icon",
        Some("wasm") => "application/wasm",
        Some("txt" | "map") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
