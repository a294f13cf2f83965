//! SSR bootstrap script.
//!
//! The script publishes the route payload on a namespaced global
//! (`globalThis[Symbol.for("<symbol>")]`) and, in production, injects
//! `modulepreload` links for the chain's deps and stylesheet links for its
//! CSS bundles. Its SHA-256 digest is taken over the exact text between
//! `<script>` and `</script>` so a CSP `script-src 'sha256-…'` source matches
//! the served bytes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::framework::output::UIRouteOutput;

/// Per-process values baked into every bootstrap script.
#[derive(Debug, Clone, Copy)]
pub struct SsrContext<'a> {
    pub symbol: &'a str,
    pub is_dev: bool,
    pub build_id: &'a str,
    pub public_path_prefix: &'a str,
}

/// Rendered `<script>` element plus the digest of its inner text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsrScript {
    pub html: String,
    /// Base64 SHA-256 of the inner script text.
    pub sha256_hash: String,
}

impl SsrScript {
    /// CSP source expression allow-listing this script.
    pub fn csp_source(&self) -> String {
        format!("'sha256-{}'", self.sha256_hash)
    }
}

/// Serialize for embedding inside an inline `<script>`.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    Ok(out)
}

pub fn render_ssr_script(output: &UIRouteOutput, ctx: &SsrContext<'_>) -> Result<SsrScript, serde_json::Error> {
    let active = &output.active;
    let symbol = script_json(ctx.symbol)?;
    // -1 is the client's "no error" sentinel.
    let outermost_error_index = active.outermost_error_index.map_or(-1, |i| i as i64);

    let inner = format!(
        r#"
	globalThis[Symbol.for({symbol})] = {{}};
	const x = globalThis[Symbol.for({symbol})];
	x.isDev = {is_dev};
	x.viteDevURL = {vite_dev_url};
	x.publicPathPrefix = {public_path_prefix};
	x.buildID = {build_id};
	x.loadersData = {loaders_data};
	x.importURLs = {import_urls};
	x.exportKeys = {export_keys};
	x.outermostErrorIndex = {outermost_error_index};
	x.splatValues = {splat_values};
	x.params = {params};
	x.hasRootData = {has_root_data};
	if (!x.isDev) {{
		const deps = {deps};
		deps.forEach((y) => {{
			const link = document.createElement("link");
			link.rel = "modulepreload";
			link.href = x.publicPathPrefix + y;
			document.head.appendChild(link);
		}});
		const cssBundles = {css_bundles};
		cssBundles.forEach((y) => {{
			const link = document.createElement("link");
			link.rel = "stylesheet";
			link.href = x.publicPathPrefix + y;
			link.setAttribute("data-{namespace}-css-bundle", y);
			document.head.appendChild(link);
		}});
	}}
"#,
        is_dev = ctx.is_dev,
        vite_dev_url = script_json(&output.vite_dev_url)?,
        public_path_prefix = script_json(ctx.public_path_prefix)?,
        build_id = script_json(ctx.build_id)?,
        loaders_data = script_json(&active.loaders_data)?,
        import_urls = script_json(&active.import_urls)?,
        export_keys = script_json(&active.export_keys)?,
        splat_values = script_json(&active.splat_values)?,
        params = script_json(&active.params)?,
        has_root_data = active.has_root_data,
        deps = script_json(&active.deps)?,
        css_bundles = script_json(&output.css_bundles)?,
        namespace = ctx.symbol,
    );

    let sha256_hash = STANDARD.encode(Sha256::digest(inner.as_bytes()));
    Ok(SsrScript {
        html: format!("<script>{inner}</script>"),
        sha256_hash,
    })
}
