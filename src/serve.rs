//! HTTP server for the project site
//!
//! `marquee serve` → serves the landing page with release downloads, the
//! quickstart page, a small JSON API, and the static site files with
//! include expansion applied on the way out.

use crate::config::Config;
use crate::html::{document, Element};
use crate::include::Expander;
use crate::quickstart::{FormState, QuickstartPage};
use crate::releases::{
    render_release_section, render_release_unavailable, Release, ReleaseClient, ReleaseError,
};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use tiny_http::{Header, Method, Request, Response, Server};

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(error: String) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Start the site server
pub fn start_site_server(config: &Config) -> std::io::Result<()> {
    let addr = format!("127.0.0.1:{}", config.server.port);
    let server = Server::http(&addr)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let url = format!("http://localhost:{}", config.server.port);
    let page = QuickstartPage::standard(&config.quickstart.program);

    eprintln!("\n\x1b[1;32mmarquee\x1b[0m");
    eprintln!("   Site: {}", url);
    eprintln!("   Quickstart: {}/quickstart", url);
    eprintln!("   Press Ctrl+C to stop\n");

    // Handle requests
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, config, &page) {
            eprintln!("Error: {}", e);
        }
    }

    Ok(())
}

fn handle_request(
    request: Request,
    config: &Config,
    page: &QuickstartPage,
) -> std::io::Result<()> {
    let url = request.url().to_string();
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url.as_str(), ""),
    };
    let method = request.method().clone();

    match (&method, path) {
        // Landing page with release downloads
        (&Method::Get, "/") | (&Method::Get, "/index.html") => {
            html_response(request, &landing_page(config))
        }

        // Quickstart page; the query string is the submitted form state
        (&Method::Get, "/quickstart") => {
            let form = FormState::from_query(query);
            html_response(request, &page.render(&form))
        }

        // API: latest release with assets in display order
        (&Method::Get, "/api/releases") => {
            let json = match fetch_latest(config) {
                Ok(release) => serde_json::to_string(&ApiResponse::success(release))?,
                Err(e) => serde_json::to_string(&ApiResponse::<Release>::failure(e.to_string()))?,
            };
            json_response(request, json)
        }

        // Anything else resolves against the site root
        (&Method::Get, other) => serve_site_file(request, config, other),

        // 404
        _ => not_found(request),
    }
}

/// Build the landing page. Release data is fetched per request; failures
/// degrade the section instead of failing the page.
fn landing_page(config: &Config) -> String {
    let mut body = String::new();
    body.push_str(&Element::new("h1").text(&config.site.title).render());
    body.push_str(
        &Element::new("p")
            .child(
                Element::new("a")
                    .attr("href", "/quickstart")
                    .text("Get started with a new project"),
            )
            .render(),
    );

    let section = match fetch_latest(config) {
        Ok(release) => render_release_section(&release),
        Err(ReleaseError::NoReleases) => render_release_unavailable("No releases available."),
        Err(e) => {
            eprintln!("Release fetch failed: {}", e);
            render_release_unavailable("Release downloads are currently unavailable.")
        }
    };
    body.push_str(&section);

    document(&config.site.title, &body)
}

fn fetch_latest(config: &Config) -> Result<Release, ReleaseError> {
    let repo = config
        .github
        .repo
        .as_deref()
        .ok_or(ReleaseError::NotConfigured)?;
    ReleaseClient::new(repo).latest()
}

/// Serve a file from the site root, expanding includes in HTML files.
fn serve_site_file(request: Request, config: &Config, url_path: &str) -> std::io::Result<()> {
    let relative = match sanitize_path(url_path) {
        Some(p) => p,
        None => return not_found(request),
    };
    let path = config.site.root.join(relative);

    if path.extension().map(|e| e == "html").unwrap_or(false) {
        let expander = match Expander::new(&config.site.root) {
            Ok(e) => e,
            Err(e) => return server_error(request, &e.to_string()),
        };
        match expander.expand_file(&path) {
            Ok(body) => html_response(request, &body),
            Err(crate::include::IncludeError::Io(ref io_err))
                if io_err.kind() == std::io::ErrorKind::NotFound =>
            {
                not_found(request)
            }
            Err(e) => server_error(request, &e.to_string()),
        }
    } else {
        match std::fs::read(&path) {
            Ok(bytes) => {
                let response = Response::from_data(bytes).with_header(
                    Header::from_bytes(&b"Content-Type"[..], content_type(&path).as_bytes())
                        .unwrap(),
                );
                request.respond(response)
            }
            Err(_) => not_found(request),
        }
    }
}

/// Reject traversal and absolute references; return the safe relative
/// path.
fn sanitize_path(url_path: &str) -> Option<PathBuf> {
    let trimmed = url_path.trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    let path = Path::new(trimmed);
    let safe = path
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if safe {
        Some(path.to_path_buf())
    } else {
        None
    }
}

fn content_type(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "html" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
    .to_string()
}

fn html_response(request: Request, body: &str) -> std::io::Result<()> {
    let response = Response::from_string(body)
        .with_header(Header::from_bytes(&b"Content-Type"[..], &b"text/html"[..]).unwrap());
    request.respond(response)
}

fn json_response(request: Request, json: String) -> std::io::Result<()> {
    let response = Response::from_string(json)
        .with_header(Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap());
    request.respond(response)
}

fn not_found(request: Request) -> std::io::Result<()> {
    let response = Response::from_string("Not found").with_status_code(404);
    request.respond(response)
}

fn server_error(request: Request, message: &str) -> std::io::Result<()> {
    eprintln!("Error: {}", message);
    let response = Response::from_string("Internal error").with_status_code(500);
    request.respond(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    // === ApiResponse Tests ===

    #[test]
    fn test_api_response_success() {
        let response: ApiResponse<String> = ApiResponse::success("hello".to_string());
        assert!(response.ok);
        assert_eq!(response.data, Some("hello".to_string()));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_api_response_failure() {
        let response: ApiResponse<Release> = ApiResponse::failure("nope".to_string());
        assert!(!response.ok);
        assert!(response.data.is_none());
        assert_eq!(response.error, Some("nope".to_string()));
    }

    #[test]
    fn test_api_response_serializes_to_json() {
        let response: ApiResponse<String> = ApiResponse::success("test".to_string());
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"ok\":true"));
        assert!(json.contains("\"data\":\"test\""));
        assert!(json.contains("\"error\":null"));
    }

    // === Path handling ===

    #[test]
    fn test_sanitize_path_accepts_normal_paths() {
        assert_eq!(
            sanitize_path("/docs/changelog.html"),
            Some(PathBuf::from("docs/changelog.html"))
        );
        assert_eq!(sanitize_path("/style.css"), Some(PathBuf::from("style.css")));
    }

    #[test]
    fn test_sanitize_path_rejects_traversal() {
        assert_eq!(sanitize_path("/../etc/passwd"), None);
        assert_eq!(sanitize_path("/docs/../../etc/passwd"), None);
        assert_eq!(sanitize_path("/"), None);
    }

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(content_type(Path::new("a.css")), "text/css");
        assert_eq!(content_type(Path::new("a.svg")), "image/svg+xml");
        assert_eq!(content_type(Path::new("a.bin")), "application/octet-stream");
        assert_eq!(content_type(Path::new("noext")), "application/octet-stream");
    }

    // === Landing page ===

    #[test]
    fn test_landing_page_without_repo_degrades() {
        // No github.repo configured: the section renders as unavailable
        // and nothing shells out to gh.
        let config = Config::default();
        let html = landing_page(&config);
        assert!(html.contains("Project Site"));
        assert!(html.contains("/quickstart"));
        assert!(html.contains("currently unavailable"));
    }
}
