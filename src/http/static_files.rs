//! Static file collaborator.
//!
//! Thin wrapper over `tower_http::services::ServeDir`: GET and HEAD for
//! files under the configured root, `index.html` for directories, 404 for
//! anything missing. A directory without `index.html` gets a generated
//! HTML listing instead of ServeDir's 404.

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
};
use std::path::{Path, PathBuf};
use tower::ServiceExt;
use tower_http::services::ServeDir;

/// Serves files from one directory.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    service: ServeDir,
}

impl StaticFiles {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            service: ServeDir::new(&root).append_index_html_on_directories(true),
            root,
        }
    }

    /// Serve one request.
    pub async fn serve(&self, request: Request<Body>) -> Response {
        let path = request.uri().path().to_string();
        let response = match self.service.clone().oneshot(request).await {
            Ok(response) => response.into_response(),
            Err(never) => match never {},
        };

        // ServeDir already redirected `/dir` to `/dir/`; only a slash-terminated
        // path can be a directory that lacks an index.
        if response.status() != StatusCode::NOT_FOUND || !path.ends_with('/') {
            return response;
        }
        match self.listing(&path).await {
            Some(listing) => listing,
            None => response,
        }
    }

    async fn listing(&self, path: &str) -> Option<Response> {
        let dir = resolve(&self.root, path)?;
        let mut entries = tokio::fs::read_dir(&dir).await.ok()?;

        let mut names = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let mut name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type().await.is_ok_and(|t| t.is_dir()) {
                name.push('/');
            }
            names.push(name);
        }
        names.sort_by_key(|name| name.to_lowercase());

        let html = render_listing(path, &names);
        let length = html.len();
        let mut response = Response::new(Body::from(html));
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
        Some(response)
    }
}

/// Map a request path onto a directory under `root`. Segments that would
/// leave the root, or that do not decode, yield `None`.
fn resolve(root: &Path, path: &str) -> Option<PathBuf> {
    let mut dir = root.to_path_buf();
    for raw in path.split('/').filter(|s| !s.is_empty()) {
        let segment = percent_decode(raw)?;
        if segment == "." || segment == ".." || segment.contains(['/', '\\', '\0']) {
            return None;
        }
        dir.push(segment);
    }
    dir.is_dir().then_some(dir)
}

fn percent_decode(segment: &str) -> Option<String> {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = segment.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

fn percent_encode(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_listing(path: &str, names: &[String]) -> String {
    let title = format!("Directory listing for {}", escape_html(path));
    let mut html = format!(
        "<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );
    for name in names {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            percent_encode(name),
            escape_html(name)
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}
