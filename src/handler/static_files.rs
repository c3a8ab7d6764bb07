//! Static file serving module
//!
//! Maps request paths onto the served root and answers with file contents,
//! index files, directory listings, redirects or 404.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, path};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Serve a GET or HEAD request from the root directory
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let server_name = state.config.http.server_name.as_str();
    let mut file_path = path::translate_path(&state.root, ctx.path);

    if is_dir(&file_path).await {
        // Relative links in the page only resolve against a slash-terminated URL
        if !ctx.path.ends_with('/') {
            let location = match ctx.query {
                Some(q) => format!("{}/?{q}", ctx.path),
                None => format!("{}/", ctx.path),
            };
            return http::build_redirect_response(&location, server_name);
        }
        match find_index_file(&file_path, &state.config.http.index_files).await {
            Some(index) => file_path = index,
            None => return listing::list_directory(&file_path, ctx, server_name).await,
        }
    } else if ctx.path.ends_with('/') {
        return file_not_found(ctx, server_name);
    }

    serve_file(&file_path, ctx, server_name).await
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

/// First configured index file that exists in `dir`
async fn find_index_file(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    for index_file in index_files {
        let candidate = dir.join(index_file);
        if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
            return Some(candidate);
        }
    }
    None
}

/// Serve a single file with Last-Modified validation
async fn serve_file(
    file_path: &Path,
    ctx: &RequestContext<'_>,
    server_name: &str,
) -> Response<Full<Bytes>> {
    // Missing files are routine, no need to log
    let Ok(metadata) = fs::metadata(file_path).await else {
        return file_not_found(ctx, server_name);
    };
    if !metadata.is_file() {
        return file_not_found(ctx, server_name);
    }

    let modified = metadata.modified().ok();
    if let Some(modified) = modified {
        if cache::is_not_modified(
            ctx.if_modified_since.as_deref(),
            ctx.has_if_none_match,
            modified,
        ) {
            return http::build_304_response(server_name);
        }
    }

    // The whole file is buffered before the response is built; very large
    // files cost their full size in memory for the duration of the request.
    let content = match fs::read(file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return file_not_found(ctx, server_name);
        }
    };

    let last_modified = modified.map(cache::format_http_date);
    http::build_file_response(
        Bytes::from(content),
        mime::content_type_for(file_path),
        last_modified.as_deref(),
        server_name,
        ctx.is_head,
    )
}

fn file_not_found(ctx: &RequestContext<'_>, server_name: &str) -> Response<Full<Bytes>> {
    http::build_error_response(
        StatusCode::NOT_FOUND,
        Some("File not found"),
        server_name,
        ctx.is_head,
    )
}
