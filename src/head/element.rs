//! Head element model.

use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

/// Characters that delimit parts of [`HeadElement::stable_key`].
const KEY_RESERVED: &AsciiSet = &CONTROLS.add(b'%').add(b'|').add(b'&').add(b'=');

/// A `<head>` element contributed by defaults or by a route segment.
///
/// An element with a non-empty `title` is the page title carrier, not a tag.
/// Attributes live in a `BTreeMap`, so iteration (and therefore rendering and
/// the dedupe key) is always sorted by attribute name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadElement {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, rename = "innerHTML", skip_serializing_if = "Option::is_none")]
    pub inner_html: Option<String>,
}

impl HeadElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn meta<K, V>(attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut element = Self::new("meta");
        for (key, value) in attributes {
            element.attributes.insert(key.into(), value.into());
        }
        element
    }

    /// `<meta name="description" content="...">`
    pub fn description(content: impl Into<String>) -> Self {
        Self::meta([("name", "description".to_string()), ("content", content.into())])
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn inner_html(mut self, html: impl Into<String>) -> Self {
        self.inner_html = Some(html.into());
        self
    }

    pub fn is_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn is_meta(&self) -> bool {
        self.tag == "meta"
    }

    /// The description meta tag is a singleton slot during dedupe.
    pub fn is_description(&self) -> bool {
        self.is_meta() && self.attributes.get("name").map(String::as_str) == Some("description")
    }

    /// Stable identity: `tag|k1=v1&k2=v2`, attributes sorted by name.
    /// Separator characters inside parts are percent-encoded.
    pub fn stable_key(&self) -> String {
        let mut key = String::with_capacity(self.tag.len() + 1 + self.attributes.len() * 16);
        key.extend(utf8_percent_encode(&self.tag, KEY_RESERVED));
        key.push('|');
        for (i, (name, value)) in self.attributes.iter().enumerate() {
            if i > 0 {
                key.push('&');
            }
            key.extend(utf8_percent_encode(name, KEY_RESERVED));
            key.push('=');
            key.extend(utf8_percent_encode(value, KEY_RESERVED));
        }
        if let Some(inner) = &self.inner_html {
            key.push('|');
            key.extend(utf8_percent_encode(inner, KEY_RESERVED));
        }
        key
    }
}
