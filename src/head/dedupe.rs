//! Head element de-duplication.
//!
//! # Rules
//! - Defaults come first, then per-segment elements outermost → innermost
//! - Title: last one wins, returned separately
//! - `<meta name="description">`: singleton slot, later occurrences overwrite
//!   the earlier one in place
//! - Everything else: deduped by [`HeadElement::stable_key`], first occurrence
//!   wins and later duplicates are dropped
//!
//! Tag allow-listing happens at render time, not here.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::head::element::HeadElement;

/// Deduped head elements, split for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadBlocks {
    pub title: String,
    pub meta: Vec<HeadElement>,
    pub rest: Vec<HeadElement>,
}

impl HeadBlocks {
    /// Flatten back into an element list (title first).
    pub fn into_elements(self) -> Vec<HeadElement> {
        let mut elements = Vec::with_capacity(1 + self.meta.len() + self.rest.len());
        if !self.title.is_empty() {
            elements.push(HeadElement::title(self.title));
        }
        elements.extend(self.meta);
        elements.extend(self.rest);
        elements
    }
}

/// Merge default and per-segment head elements into title/meta/rest.
pub fn dedupe(defaults: &[HeadElement], per_segment: &[HeadElement]) -> HeadBlocks {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept: Vec<&HeadElement> = Vec::with_capacity(defaults.len() + per_segment.len());
    let mut title: Option<&str> = None;
    let mut description_idx: Option<usize> = None;

    for element in defaults.iter().chain(per_segment) {
        if element.is_title() {
            title = element.title.as_deref();
        } else if element.is_description() {
            match description_idx {
                Some(idx) => kept[idx] = element,
                None => {
                    description_idx = Some(kept.len());
                    kept.push(element);
                }
            }
        } else if seen.insert(element.stable_key()) {
            kept.push(element);
        }
    }

    let (meta, rest): (Vec<&HeadElement>, Vec<&HeadElement>) =
        kept.into_iter().partition(|e| e.is_meta());

    HeadBlocks {
        title: title.unwrap_or_default().to_string(),
        meta: meta.into_iter().cloned().collect(),
        rest: rest.into_iter().cloned().collect(),
    }
}
