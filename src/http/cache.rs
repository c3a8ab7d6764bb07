//! HTTP cache validation module
//!
//! `Last-Modified` generation and `If-Modified-Since` conditional handling.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    let dt: DateTime<Utc> = time.into();
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse an HTTP date header value
///
/// Returns `None` for anything that is not a valid RFC 2822 style date.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Check whether a conditional GET can be answered with 304
///
/// `If-Modified-Since` is ignored when the client also sent `If-None-Match`.
/// The file time is compared at one-second resolution, the precision of the
/// header itself.
///
/// # Arguments
/// * `if_modified_since` - Client-sent If-Modified-Since header
/// * `has_if_none_match` - Whether the request carried If-None-Match
/// * `modified` - File modification time
pub fn is_not_modified(
    if_modified_since: Option<&str>,
    has_if_none_match: bool,
    modified: SystemTime,
) -> bool {
    if has_if_none_match {
        return false;
    }
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    let modified: DateTime<Utc> = modified.into();
    modified.timestamp() <= since.timestamp()
}
