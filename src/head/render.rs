//! Head element rendering.
//!
//! Output layout:
//! ```text
//! <title>…</title>
//! <!-- data-river="meta-start" -->
//! …meta elements…
//! <!-- data-river="meta-end" -->
//! <!-- data-river="rest-start" -->
//! …everything else…
//! <!-- data-river="rest-end" -->
//! ```
//! The markers let the client swap head elements on navigation.

use std::borrow::Cow;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::head::dedupe::HeadBlocks;
use crate::head::element::HeadElement;

/// Tags that may be rendered into `<head>`; anything else is skipped.
pub const PERMITTED_TAGS: [&str; 6] = ["meta", "base", "link", "style", "script", "noscript"];

/// Rendered head markup plus CSP sources for its inline scripts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedHead {
    pub html: String,
    /// `'sha256-…'` source for every inline `<script>` body, in render order.
    pub inline_script_sources: Vec<String>,
}

/// CSP hash source for an inline script body.
pub fn csp_hash_source(script: &str) -> String {
    format!("'sha256-{}'", STANDARD.encode(Sha256::digest(script.as_bytes())))
}

/// Renders [`HeadBlocks`] with namespaced section markers.
#[derive(Debug, Clone)]
pub struct HeadRenderer {
    meta_start: String,
    meta_end: String,
    rest_start: String,
    rest_end: String,
}

impl HeadRenderer {
    pub fn new(namespace: &str) -> Self {
        let marker = |name: &str| format!("<!-- data-{namespace}=\"{name}\" -->");
        Self {
            meta_start: marker("meta-start"),
            meta_end: marker("meta-end"),
            rest_start: marker("rest-start"),
            rest_end: marker("rest-end"),
        }
    }

    pub fn render(&self, blocks: &HeadBlocks) -> RenderedHead {
        let mut out = String::new();

        out.push_str("<title>");
        out.push_str(&escape_html(&blocks.title));
        out.push_str("</title>\n");

        out.push_str(&self.meta_start);
        out.push('\n');
        for element in &blocks.meta {
            render_element(&mut out, element);
        }
        out.push_str(&self.meta_end);
        out.push('\n');

        out.push_str(&self.rest_start);
        out.push('\n');
        for element in &blocks.rest {
            render_element(&mut out, element);
        }
        out.push_str(&self.rest_end);
        out.push('\n');

        let inline_script_sources = blocks
            .meta
            .iter()
            .chain(&blocks.rest)
            .filter(|e| e.tag == "script")
            .filter_map(|e| e.inner_html.as_deref())
            .filter(|inner| !inner.is_empty())
            .map(csp_hash_source)
            .collect();

        RenderedHead {
            html: out,
            inline_script_sources,
        }
    }
}

/// Render a single element; elements outside [`PERMITTED_TAGS`] are skipped.
pub fn render_element(out: &mut String, element: &HeadElement) {
    if !PERMITTED_TAGS.contains(&element.tag.as_str()) {
        tracing::debug!(tag = %element.tag, "Skipping non-permitted head element");
        return;
    }

    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(&escape_html(name));
        out.push_str("=\"");
        out.push_str(&escape_html(value));
        out.push('"');
    }

    match (&element.inner_html, element.tag.as_str()) {
        (Some(inner), _) => {
            out.push('>');
            out.push_str(inner);
            out.push_str("</");
            out.push_str(&element.tag);
            out.push('>');
        }
        (None, "script" | "style" | "noscript") => {
            out.push_str("></");
            out.push_str(&element.tag);
            out.push('>');
        }
        (None, _) => out.push_str(" />"),
    }
    out.push('\n');
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }
    let mut escaped = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
