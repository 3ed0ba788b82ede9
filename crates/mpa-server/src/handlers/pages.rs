//! Virtual page serving.
//!
//! The single fallback handler implementing the ordered request pipeline:
//! virtual page match, static files, `/` listing, 404.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use mpa_site::{
    Page, PageRegistry, PageRenderError, TransformContext, apply_transforms, entry_url,
    inject_entry_script,
};

use crate::state::AppState;
use crate::static_files;

/// Handle any request not claimed by a fixed route (i.e. all of them).
pub(crate) async fn serve_page(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
) -> Response {
    let raw = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path(), |path_and_query| path_and_query.as_str());
    let path = strip_request_path(raw);

    if let Some(page) = find_page(&state.registry, path) {
        if accepts_html(req.headers()) {
            match render_virtual_page(&state, page) {
                Ok(html) => {
                    tracing::info!(page = %page.name, path, "serving virtual page");
                    return Html(html).into_response();
                }
                // Fall through; the router never owns terminal error responses
                Err(error) => {
                    tracing::warn!(page = %page.name, %error, "failed to render virtual page");
                }
            }
        }
    }

    if let Some(response) = static_files::serve_from_root(&state.root, path).await {
        return response;
    }

    if path == "/" {
        return pages_index(&state.registry);
    }

    StatusCode::NOT_FOUND.into_response()
}

/// Strip query and fragment from a request path.
fn strip_request_path(raw: &str) -> &str {
    let without_query = raw.split('?').next().unwrap_or(raw);
    without_query.split('#').next().unwrap_or(without_query)
}

/// Match a request path against the registry.
///
/// Each page answers at `/name`, `/name/`, `/name.html`, `/name/index.html`
/// and `/` + its resolved output path; the first matching page wins. The
/// bare `/` falls back to the page named `index` when one exists.
fn find_page<'a>(registry: &'a PageRegistry, path: &str) -> Option<&'a Page> {
    for (name, page) in registry {
        if path == format!("/{name}")
            || path == format!("/{name}/")
            || path == format!("/{name}.html")
            || path == format!("/{name}/index.html")
            || path == format!("/{}", page.output_path)
        {
            return Some(page);
        }
    }

    if path == "/" {
        return registry.get("index");
    }
    None
}

/// True when the request declares acceptance of HTML content.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Render a page for the dev server.
///
/// Applies the post-processing chain, then injects the entry-script tag
/// with the configured base-path prefix.
fn render_virtual_page(state: &AppState, page: &Page) -> Result<String, PageRenderError> {
    let html = state.renderer.render_page(page)?;
    let context = TransformContext {
        page,
        build_mode: false,
    };
    let html = apply_transforms(&state.transforms, html, &context);
    Ok(inject_entry_script(
        &html,
        &entry_url(&state.root, &page.entry, &state.base),
    ))
}

/// Generated index: one link per discovered page.
fn pages_index(registry: &PageRegistry) -> Response {
    let mut body = String::new();
    for (name, page) in registry {
        let title = page.title().unwrap_or(name);
        body.push_str(&format!(
            "<a target=\"_self\" href=\"{name}.html\">{title}</a><br/>\n"
        ));
    }
    Html(body).into_response()
}
