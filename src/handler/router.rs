//! Request dispatch module
//!
//! Entry point for HTTP request processing: method checks, the optional CORS
//! middleware, static file dispatch, and access logging.

use crate::config::AppState;
use crate::handler::{cors, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{IF_MODIFIED_SINCE, IF_NONE_MATCH};
use hyper::{Method, Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub method: &'a Method,
    /// Raw (still percent-encoded) path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub has_if_none_match: bool,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        let headers = req.headers();
        Self {
            method: req.method(),
            path: req.uri().path(),
            query: req.uri().query(),
            is_head: *req.method() == Method::HEAD,
            if_modified_since: headers
                .get(IF_MODIFIED_SINCE)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
            has_if_none_match: headers.contains_key(IF_NONE_MATCH),
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let ctx = RequestContext::from_request(&req);

    let mut response = dispatch(&ctx, &state).await;
    if state.cors_enabled() {
        cors::apply_headers(response.headers_mut(), &state.config.http.cors);
    }

    if state.config.logging.access_log {
        log_access(&ctx, req.version(), peer_addr, &response);
    }
    Ok(response)
}

async fn dispatch(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let server_name = state.config.http.server_name.as_str();

    if state.cors_enabled() {
        if let Some(resp) = cors::preflight_response(ctx.method, server_name) {
            return resp;
        }
    }

    match *ctx.method {
        Method::GET | Method::HEAD => static_files::serve(ctx, state).await,
        _ => http::build_error_response(
            StatusCode::NOT_IMPLEMENTED,
            Some(&format!("Unsupported method ('{}')", ctx.method)),
            server_name,
            false,
        ),
    }
}

fn log_access(
    ctx: &RequestContext<'_>,
    version: Version,
    peer_addr: SocketAddr,
    response: &Response<Full<Bytes>>,
) {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        ctx.method.to_string(),
        ctx.path.to_string(),
    );
    entry.query = ctx.query.map(ToString::to_string);
    entry.http_version = http_version_label(version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    logger::log_access(&entry);
}

const fn http_version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Variant};
    use http_body_util::BodyExt;
    use hyper::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_TYPE, LOCATION};
    use std::fs;

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn state_for(variant: Variant, root: &std::path::Path) -> Arc<AppState> {
        let mut config = Config::preset(variant).unwrap();
        config.logging.access_log = false;
        Arc::new(AppState::new(config, root.canonicalize().unwrap()))
    }

    fn request(method: Method, uri: &str) -> Request<()> {
        Request::builder().method(method).uri(uri).body(()).unwrap()
    }

    async fn send(
        state: &Arc<AppState>,
        req: Request<()>,
    ) -> (StatusCode, hyper::HeaderMap, Bytes) {
        let response = handle_request(req, peer(), Arc::clone(state)).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, body)
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("data.json"), b"{\"hp\":10}").unwrap();
        fs::create_dir(dir.path().join("site")).unwrap();
        fs::write(dir.path().join("site/index.html"), b"<h1>hi</h1>").unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_get_file() {
        let dir = fixture();
        let state = state_for(Variant::Basic, dir.path());
        let (status, headers, body) = send(&state, request(Method::GET, "/data.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(&body[..], b"{\"hp\":10}");
        assert!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = fixture();
        let state = state_for(Variant::Basic, dir.path());
        let (status, _, body) = send(&state, request(Method::GET, "/nope.json")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(String::from_utf8_lossy(&body).contains("File not found"));

        // Trailing slash on a file
        let (status, _, _) = send(&state, request(Method::GET, "/data.json/")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_directory_redirect_and_index() {
        let dir = fixture();
        let state = state_for(Variant::Basic, dir.path());
        let (status, headers, _) = send(&state, request(Method::GET, "/site?x=1")).await;
        assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
        assert_eq!(headers[LOCATION], "/site/?x=1");

        let (status, headers, body) = send(&state, request(Method::GET, "/site/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[CONTENT_TYPE], "text/html; charset=utf-8");
        assert_eq!(&body[..], b"<h1>hi</h1>");
    }

    #[tokio::test]
    async fn test_directory_listing() {
        let dir = fixture();
        let state = state_for(Variant::Basic, dir.path());
        let (status, _, body) = send(&state, request(Method::GET, "/")).await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8_lossy(&body);
        assert!(html.contains("Directory listing for /"));
        assert!(html.contains("<a href=\"data.json\">data.json</a>"));
        assert!(html.contains("<a href=\"empty/\">empty/</a>"));
        assert!(html.contains("<a href=\"site/\">site/</a>"));
        let data = html.find("data.json").unwrap();
        let empty = html.find("empty/").unwrap();
        let site = html.find("site/").unwrap();
        assert!(data < empty && empty < site);
    }

    #[tokio::test]
    async fn test_head_has_headers_only() {
        let dir = fixture();
        let state = state_for(Variant::Basic, dir.path());
        let (status, headers, body) = send(&state, request(Method::HEAD, "/data.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["Content-Length"], "9");
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_large_file_served_whole() {
        let dir = fixture();
        let data: Vec<u8> = (0..4 * 1024 * 1024u32)
            .map(|i| u8::try_from(i % 251).unwrap())
            .collect();
        fs::write(dir.path().join("big.bin"), &data).unwrap();
        let state = state_for(Variant::Basic, dir.path());

        let (status, headers, body) = send(&state, request(Method::GET, "/big.bin")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["Content-Length"], data.len().to_string().as_str());
        assert_eq!(body.len(), data.len());
        assert!(body[..] == data[..]);
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let dir = fixture();
        let state = state_for(Variant::Basic, dir.path());
        let (status, _, body) = send(&state, request(Method::POST, "/data.json")).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert!(String::from_utf8_lossy(&body).contains("Unsupported method ('POST')"));

        // Without the CORS middleware OPTIONS is just another unsupported method
        let (status, _, _) = send(&state, request(Method::OPTIONS, "/")).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_cors_headers_on_every_response() {
        let dir = fixture();
        let state = state_for(Variant::Cors, dir.path());
        for (method, uri) in [
            (Method::GET, "/data.json"),
            (Method::GET, "/missing"),
            (Method::GET, "/site"),
            (Method::HEAD, "/"),
            (Method::POST, "/data.json"),
            (Method::DELETE, "/x"),
        ] {
            let (_, headers, _) = send(&state, request(method.clone(), uri)).await;
            assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*", "{method} {uri}");
            assert_eq!(
                headers[CACHE_CONTROL],
                "no-store, no-cache, must-revalidate"
            );
        }
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let dir = fixture();
        let state = state_for(Variant::Cors, dir.path());
        for uri in ["/data.json", "/does/not/exist", "/"] {
            let (status, headers, body) = send(&state, request(Method::OPTIONS, uri)).await;
            assert_eq!(status, StatusCode::OK);
            assert!(body.is_empty());
            assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
            assert_eq!(headers["Access-Control-Allow-Methods"], "GET");
            assert_eq!(headers["Access-Control-Allow-Headers"], "Content-Type");
        }
    }

    #[tokio::test]
    async fn test_if_modified_since() {
        let dir = fixture();
        let state = state_for(Variant::Basic, dir.path());
        let (_, headers, _) = send(&state, request(Method::GET, "/data.json")).await;
        let last_modified = headers["Last-Modified"].to_str().unwrap().to_string();

        let req = Request::builder()
            .uri("/data.json")
            .header(IF_MODIFIED_SINCE, &last_modified)
            .body(())
            .unwrap();
        let (status, _, body) = send(&state, req).await;
        assert_eq!(status, StatusCode::NOT_MODIFIED);
        assert!(body.is_empty());

        let req = Request::builder()
            .uri("/data.json")
            .header(IF_MODIFIED_SINCE, &last_modified)
            .header(IF_NONE_MATCH, "\"abc\"")
            .body(())
            .unwrap();
        let (status, _, _) = send(&state, req).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_traversal_stays_in_root() {
        let outer = tempfile::tempdir().unwrap();
        fs::write(outer.path().join("secret.txt"), b"secret").unwrap();
        let root = outer.path().join("public");
        fs::create_dir(&root).unwrap();
        let state = state_for(Variant::Basic, &root);

        let (status, _, _) = send(&state, request(Method::GET, "/../secret.txt")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _, _) = send(&state, request(Method::GET, "/%2e%2e/secret.txt")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
