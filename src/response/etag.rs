//! Content-digest ETags and conditional requests.

use axum::http::{header, HeaderMap, Method};
use sha2::{Digest, Sha256};

/// Strong ETag over `input`: a quoted hex SHA-256 digest.
pub fn to_quoted_sha256_etag(input: &[u8]) -> String {
    format!("\"{}\"", hex::encode(Sha256::digest(input)))
}

/// True when the request's `If-None-Match` already names `etag`.
///
/// Conservative: only GET/HEAD qualify, and only `If-None-Match` is honored
/// (date-based validators are ignored).
pub fn should_return_304_conservative(method: &Method, headers: &HeaderMap, etag: &str) -> bool {
    if method != Method::GET && method != Method::HEAD {
        return false;
    }
    let wanted = etag.trim_start_matches("W/");

    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .any(|candidate| candidate == "*" || candidate.trim_start_matches("W/") == wanted)
}
