//! CORS middleware
//!
//! Composed in front of the static file handler: preflight requests are
//! answered here, and every outgoing response is decorated with the
//! configured cross-origin and cache headers.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderMap, HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL,
};
use hyper::{Method, Response};

use crate::config::CorsConfig;
use crate::http;
use crate::logger;

/// Short-circuit `OPTIONS` with a bare 200
///
/// The request's origin, method and headers are not inspected; the
/// permissions are whatever [`apply_headers`] advertises.
pub fn preflight_response(method: &Method, server_name: &str) -> Option<Response<Full<Bytes>>> {
    (*method == Method::OPTIONS).then(|| http::build_options_response(server_name))
}

/// Append the CORS and cache headers to a response
pub fn apply_headers(headers: &mut HeaderMap, cors: &CorsConfig) {
    let pairs: [(HeaderName, &str); 4] = [
        (ACCESS_CONTROL_ALLOW_ORIGIN, cors.allow_origin.as_str()),
        (ACCESS_CONTROL_ALLOW_METHODS, cors.allow_methods.as_str()),
        (ACCESS_CONTROL_ALLOW_HEADERS, cors.allow_headers.as_str()),
        (CACHE_CONTROL, cors.cache_control.as_str()),
    ];

    for (name, value) in pairs {
        match HeaderValue::from_str(value) {
            Ok(v) => {
                headers.append(name, v);
            }
            Err(e) => logger::log_warning(&format!("Skipping invalid {name} value '{value}': {e}")),
        }
    }
}
