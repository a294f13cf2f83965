//! Response header policy.
//!
//! # Responsibilities
//! - Build-id header on every framework response
//! - Cache-Control policy for UI responses, unless a segment already set one
//! - Security headers (nosniff, CSP allow-listing the SSR script)

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

/// Build identifier header, read by the client to detect deploys.
pub const BUILD_ID_HEADER: HeaderName = HeaderName::from_static("x-river-build-id");

pub const CACHE_CONTROL_JSON: &str = "private, max-age=0, must-revalidate, no-cache";
pub const CACHE_CONTROL_HTML: &str = "private, max-age=0, must-revalidate, no-cache, no-store";

pub fn set_build_id(headers: &mut HeaderMap, build_id: &str) {
    match HeaderValue::from_str(build_id) {
        Ok(value) => {
            headers.insert(BUILD_ID_HEADER, value);
        }
        Err(e) => tracing::error!(build_id, error = %e, "Build id is not a valid header value"),
    }
}

/// Apply the UI cache policy when nothing upstream chose one.
pub fn apply_cache_policy(headers: &mut HeaderMap, is_json: bool) {
    if headers.contains_key(header::CACHE_CONTROL) {
        return;
    }
    let policy = if is_json { CACHE_CONTROL_JSON } else { CACHE_CONTROL_HTML };
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(policy));
}

pub fn apply_nosniff(headers: &mut HeaderMap) {
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
}

/// `script-src` allow-listing same-origin scripts, the inline SSR script,
/// inline head scripts and, in dev, the Vite dev server.
pub fn content_security_policy(ssr_csp_source: &str, inline_sources: &[String], vite_dev_url: Option<&str>) -> String {
    let mut script_src = format!("script-src 'self' {ssr_csp_source}");
    for source in inline_sources {
        script_src.push(' ');
        script_src.push_str(source);
    }
    if let Some(vite) = vite_dev_url {
        script_src.push(' ');
        script_src.push_str(vite.trim_end_matches('/'));
    }
    format!("{script_src}; object-src 'none'; base-uri 'self'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_policy_respects_existing() {
        let mut headers = HeaderMap::new();
        apply_cache_policy(&mut headers, false);
        assert_eq!(headers[header::CACHE_CONTROL], CACHE_CONTROL_HTML);

        let mut headers = HeaderMap::new();
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("public, max-age=60"));
        apply_cache_policy(&mut headers, true);
        assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=60");
    }

    #[test]
    fn test_csp() {
        assert_eq!(
            content_security_policy("'sha256-abc'", &[], Some("http://localhost:5173/")),
            "script-src 'self' 'sha256-abc' http://localhost:5173; object-src 'none'; base-uri 'self'"
        );
        assert_eq!(
            content_security_policy("'sha256-abc'", &["'sha256-def'".to_string()], None),
            "script-src 'self' 'sha256-abc' 'sha256-def'; object-src 'none'; base-uri 'self'"
        );
    }
}
