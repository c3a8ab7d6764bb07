//! HTTP response building module
//!
//! Builders for every response the file servers emit. Each one stamps the
//! `Server` header; hyper adds `Date` on the way out.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::path::html_escape;

/// Build an error response with the standard HTML error page
///
/// The body is omitted for HEAD requests and for statuses that must not
/// carry one (1xx, 204, 304).
pub fn build_error_response(
    status: StatusCode,
    message: Option<&str>,
    server_name: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let reason = status.canonical_reason().unwrap_or("Unknown");
    let message = message.unwrap_or(reason);

    let mut builder = Response::builder()
        .status(status)
        .header("Server", server_name)
        .header("Connection", "close");

    let has_body = !is_head
        && !status.is_informational()
        && status != StatusCode::NO_CONTENT
        && status != StatusCode::NOT_MODIFIED;

    let body = if has_body {
        let page = render_error_page(status, message);
        builder = builder
            .header("Content-Type", "text/html;charset=utf-8")
            .header("Content-Length", page.len());
        Bytes::from(page)
    } else {
        Bytes::new()
    };

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error(status.as_str(), &e);
        bare_response(status)
    })
}

fn render_error_page(status: StatusCode, message: &str) -> String {
    format!(
        r#"<!DOCTYPE HTML>
<html lang="en">
    <head>
        <meta charset="utf-8">
        <title>Error response</title>
    </head>
    <body>
        <h1>Error response</h1>
        <p>Error code: {code}</p>
        <p>Message: {message}.</p>
        <p>Error code explanation: {code} - {explain}.</p>
    </body>
</html>
"#,
        code = status.as_u16(),
        message = html_escape(message),
        explain = error_explanation(status),
    )
}

/// Long-form description shown on error pages
fn error_explanation(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Bad request syntax or unsupported method",
        StatusCode::FORBIDDEN => "Request forbidden -- authorization will not help",
        StatusCode::NOT_FOUND => "Nothing matches the given URI",
        StatusCode::METHOD_NOT_ALLOWED => "Specified method is invalid for this resource",
        StatusCode::INTERNAL_SERVER_ERROR => "Server got itself in trouble",
        StatusCode::NOT_IMPLEMENTED => "Server does not support this operation",
        _ => status.canonical_reason().unwrap_or("Unknown error"),
    }
}

/// Build 301 redirect to the slash-terminated form of a directory URL
pub fn build_redirect_response(location: &str, server_name: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header("Server", server_name)
        .header("Location", location)
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            bare_response(StatusCode::MOVED_PERMANENTLY)
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(server_name: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("Server", server_name)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            bare_response(StatusCode::NOT_MODIFIED)
        })
}

/// Build the preflight answer: 200 with an empty body and nothing else
pub fn build_options_response(server_name: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Server", server_name)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            bare_response(StatusCode::OK)
        })
}

/// Build 200 response for a file on disk
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    last_modified: Option<&str>,
    server_name: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header("Server", server_name)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length);
    if let Some(last_modified) = last_modified {
        builder = builder.header("Last-Modified", last_modified);
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        bare_response(StatusCode::OK)
    })
}

/// Build generic HTML response
pub fn build_html_response(
    content: String,
    server_name: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Server", server_name)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            bare_response(StatusCode::OK)
        })
}

fn bare_response(status: StatusCode) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_error_page() {
        let response =
            build_error_response(StatusCode::NOT_FOUND, Some("File not found"), "test", false);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["Server"], "test");
        assert_eq!(
            response.headers()["Content-Type"],
            "text/html;charset=utf-8"
        );
        let body = body_string(response).await;
        assert!(body.contains("<p>Error code: 404</p>"));
        assert!(body.contains("<p>Message: File not found.</p>"));
        assert!(body.contains("404 - Nothing matches the given URI."));
    }

    #[tokio::test]
    async fn test_error_message_is_escaped() {
        let response = build_error_response(
            StatusCode::NOT_IMPLEMENTED,
            Some("Unsupported method ('<X>')"),
            "test",
            false,
        );
        let body = body_string(response).await;
        assert!(body.contains("Unsupported method ('&lt;X&gt;')"));
    }

    #[tokio::test]
    async fn test_error_head_has_no_body() {
        let response = build_error_response(StatusCode::NOT_FOUND, None, "test", true);
        assert!(response.headers().get("Content-Length").is_none());
        assert!(body_string(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_file_response_head() {
        let response = build_file_response(
            Bytes::from_static(b"{\"a\":1}"),
            "application/json",
            Some("Sun, 06 Nov 1994 08:49:37 GMT"),
            "test",
            true,
        );
        assert_eq!(response.headers()["Content-Length"], "7");
        assert_eq!(
            response.headers()["Last-Modified"],
            "Sun, 06 Nov 1994 08:49:37 GMT"
        );
        assert!(body_string(response).await.is_empty());
    }

    #[test]
    fn test_redirect() {
        let response = build_redirect_response("/docs/?x=1", "test");
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()["Location"], "/docs/?x=1");
    }
}
