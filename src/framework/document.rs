//! Root HTML document.

use std::fmt;

use thiserror::Error;

use crate::assets::BuildManifest;
use crate::head::escape_html;

#[derive(Debug, Error)]
#[error("root template failed: {message}")]
pub struct TemplateError {
    message: String,
}

impl TemplateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Pre-rendered fragments handed to a [`RootTemplate`].
#[derive(Debug, Clone, Default)]
pub struct DocumentParts {
    /// Title, head blocks, critical CSS and the stylesheet link.
    pub head: String,
    pub ssr_script: String,
    /// Base64 SHA-256 of the SSR script's inner text.
    pub ssr_script_sha256: String,
    pub root_id: String,
    pub body_scripts: String,
}

/// Renders the outer document around the framework's fragments.
pub trait RootTemplate: Send + Sync + fmt::Debug {
    fn render(&self, parts: &DocumentParts) -> Result<String, TemplateError>;
}

#[derive(Debug, Clone, Default)]
pub struct DefaultRootTemplate {
    pub lang: Option<String>,
}

impl RootTemplate for DefaultRootTemplate {
    fn render(&self, parts: &DocumentParts) -> Result<String, TemplateError> {
        let lang = escape_html(self.lang.as_deref().unwrap_or("en"));
        Ok(format!(
            "<!doctype html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\" />\n{head}</head>\n<body>\n{ssr}\n<div id=\"{root}\"></div>\n{scripts}\n</body>\n</html>\n",
            head = parts.head,
            ssr = parts.ssr_script,
            root = escape_html(&parts.root_id),
            scripts = parts.body_scripts,
        ))
    }
}

/// Head fragment: rendered head blocks, then critical CSS and the stylesheet link.
pub fn head_section(rendered_head: &str, manifest: &BuildManifest, public_path_prefix: &str) -> String {
    let mut out = String::from(rendered_head);
    if !manifest.critical_css.is_empty() {
        out.push_str("<style>");
        out.push_str(&manifest.critical_css.replace("</style", "<\\/style"));
        out.push_str("</style>\n");
    }
    if !manifest.stylesheet_url.is_empty() {
        out.push_str(&format!(
            "<link rel=\"stylesheet\" href=\"{}\" />\n",
            escape_html(&join_public(public_path_prefix, &manifest.stylesheet_url))
        ));
    }
    out
}

/// Body scripts: the hashed client entry in production, Vite client + source entry in dev.
pub fn body_scripts(manifest: &BuildManifest, public_path_prefix: &str, vite_dev_url: Option<&str>) -> String {
    match vite_dev_url {
        Some(vite) => {
            let vite = vite.trim_end_matches('/');
            format!(
                "<script type=\"module\" src=\"{}/@vite/client\"></script>\n<script type=\"module\" src=\"{}/{}\"></script>",
                escape_html(vite),
                escape_html(vite),
                escape_html(manifest.client_entry_src.trim_start_matches('/')),
            )
        }
        None => format!(
            "<script type=\"module\" src=\"{}\"></script>",
            escape_html(&join_public(public_path_prefix, &manifest.client_entry_out))
        ),
    }
}

fn join_public(prefix: &str, path: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> BuildManifest {
        BuildManifest {
            client_entry_src: "src/entry.tsx".into(),
            client_entry_out: "assets/entry-1a.js".into(),
            critical_css: "body{margin:0}".into(),
            stylesheet_url: "assets/main.css".into(),
            ..BuildManifest::empty()
        }
    }

    #[test]
    fn test_head_section_appends_css() {
        let head = head_section("<title>x</title>\n", &manifest(), "/public/");
        assert!(head.starts_with("<title>x</title>"));
        assert!(head.contains("<style>body{margin:0}</style>"));
        assert!(head.contains(r#"<link rel="stylesheet" href="/public/assets/main.css" />"#));
    }

    #[test]
    fn test_body_scripts_by_mode() {
        let prod = body_scripts(&manifest(), "/", None);
        assert_eq!(prod, r#"<script type="module" src="/assets/entry-1a.js"></script>"#);

        let dev = body_scripts(&manifest(), "/", Some("http://localhost:5173/"));
        assert!(dev.contains(r#"src="http://localhost:5173/@vite/client""#));
        assert!(dev.contains(r#"src="http://localhost:5173/src/entry.tsx""#));
    }

    #[test]
    fn test_default_template_layout() {
        let html = DefaultRootTemplate::default()
            .render(&DocumentParts {
                head: "<title>t</title>\n".into(),
                ssr_script: "<script>1</script>".into(),
                root_id: "river-root".into(),
                body_scripts: "<script src=\"e.js\"></script>".into(),
                ..DocumentParts::default()
            })
            .unwrap();
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<div id=\"river-root\"></div>"));
        let ssr = html.find("<script>1</script>").unwrap();
        let root = html.find("river-root").unwrap();
        assert!(ssr < root);
    }
}
