//! Static File Serving
//!
//! Serves a built single-page frontend from `STATIC_DIR`. Paths that do not
//! match a file fall back to `index.html` so client-side routes such as
//! `/books/42` resolve in the browser. Without a configured directory, `/`
//! returns a short page describing the API.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::path::{Path, PathBuf};
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

/// Create router for serving static files
pub fn router(static_dir: Option<&Path>) -> Router {
    match static_dir.and_then(existing_dir) {
        Some(dir) => {
            let index = dir.join("index.html");
            let serve_dir = ServeDir::new(&dir)
                .append_index_html_on_directories(true)
                .fallback(ServeFile::new(index));

            Router::new().fallback_service(serve_dir)
        }
        None => Router::new()
            .route("/", get(serve_api_index))
            .fallback(not_found),
    }
}

fn existing_dir(path: &Path) -> Option<PathBuf> {
    if path.is_dir() {
        info!(path = %path.display(), "Serving frontend from static directory");
        Some(path.to_path_buf())
    } else {
        warn!(path = %path.display(), "Static directory not found, frontend disabled");
        None
    }
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn serve_api_index() -> Response {
    let html = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Book Jobs - API Server</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 720px;
            margin: 0 auto;
            padding: 40px 20px;
            color: #222;
        }
        code {
            background: #f2f2f2;
            padding: 2px 6px;
            border-radius: 4px;
        }
        pre {
            background: #f7f7f7;
            padding: 12px;
            border-radius: 6px;
            overflow-x: auto;
        }
    </style>
</head>
<body>
    <h1>Book Jobs</h1>
    <p>The API is running. No frontend is configured; set <code>STATIC_DIR</code> to serve one.</p>

    <h3>API Endpoints</h3>
    <ul>
        <li><code>GET /api/health</code> - Health check</li>
        <li><code>POST /api/export</code> - Create an export job
            (<code>epub</code>, <code>pdf</code>)</li>
        <li><code>GET /api/export</code> - Export jobs grouped by state</li>
        <li><code>POST /api/import</code> - Create an import job
            (<code>word</code>, <code>pdf</code>, <code>wattpad</code>, <code>evernote</code>)</li>
        <li><code>GET /api/import</code> - Import jobs grouped by state</li>
    </ul>

    <h4>Example:</h4>
    <pre>curl -X POST http://localhost:3000/api/export \
  -H "Content-Type: application/json" \
  -d '{"bookId": "b1", "kind": "epub"}'</pre>
</body>
</html>"#;

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
        .into_response()
}
