//! Directory listing module
//!
//! Renders an HTML index for directories that have no index file.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::fmt::Write;
use std::path::Path;
use tokio::fs;

use crate::handler::router::RequestContext;
use crate::http::{self, path};
use crate::logger;

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    /// Directory, or a symlink resolving to one
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    /// Text shown for the entry: `/` marks directories, `@` marks symlinks
    fn display_name(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    fn link_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Serve the listing for `dir`, or 404 if it cannot be read
pub async fn list_directory(
    dir: &Path,
    ctx: &RequestContext<'_>,
    server_name: &str,
) -> Response<Full<Bytes>> {
    let mut read_dir = match fs::read_dir(dir).await {
        Ok(r) => r,
        Err(e) => {
            logger::log_warning(&format!("Cannot list '{}': {e}", dir.display()));
            return http::build_error_response(
                StatusCode::NOT_FOUND,
                Some("No permission to list directory"),
                server_name,
                ctx.is_head,
            );
        }
    };

    let mut entries = Vec::new();
    loop {
        match read_dir.next_entry().await {
            Ok(Some(entry)) => {
                let is_symlink = entry.file_type().await.is_ok_and(|ft| ft.is_symlink());
                // Follows symlinks, so a link to a directory lists as one
                let is_dir = fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir());
                entries.push(ListingEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    is_dir,
                    is_symlink,
                });
            }
            Ok(None) => break,
            Err(e) => {
                logger::log_warning(&format!("Error reading '{}': {e}", dir.display()));
                break;
            }
        }
    }
    entries.sort_by_key(|e| e.name.to_lowercase());

    let display_path = path::percent_decode(ctx.path);
    http::build_html_response(render(&display_path, &entries), server_name, ctx.is_head)
}

/// Render the listing page for already-sorted entries
pub fn render(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", path::html_escape(display_path));

    let mut html = String::new();
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{title}</title>\n</head>\n<body>");
    let _ = writeln!(html, "<h1>{title}</h1>\n<hr>\n<ul>");
    for entry in entries {
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            path::percent_encode(&entry.link_name()),
            path::html_escape(&entry.display_name()),
        );
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}
