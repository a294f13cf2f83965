//! Route pattern parsing.
//!
//! # Syntax
//! - `""` (or `"/"`): root layout, owns no path segments
//! - `/about`: static segment
//! - `/users/:id`: dynamic segment, captured as param `id`
//! - `/files/*`: trailing splat, captures the rest of the path
//! - `/blog/_index`: index leaf, matches its parent's path exactly
//!
//! # Design Decisions
//! - The normalized form drops param names (`/users/:`), so two chains that
//!   only differ in param naming share one cache key
//! - Splat and index segments are only legal in last position

use std::collections::BTreeMap;

use thiserror::Error;

/// Reserved segment name for index leaves.
pub const INDEX_SEGMENT: &str = "_index";

/// Path parameters extracted by a match (name → value).
pub type Params = BTreeMap<String, String>;

/// One parsed pattern segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Static(String),
    Param(String),
    Splat,
    Index,
}

impl Segment {
    /// Comparison key shared by equivalent segments (param names ignored).
    fn key(&self) -> &str {
        match self {
            Segment::Static(value) => value,
            Segment::Param(_) => ":",
            Segment::Splat => "*",
            Segment::Index => INDEX_SEGMENT,
        }
    }
}

/// Error produced when a pattern string is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern `{0}` must start with '/'")]
    MissingLeadingSlash(String),
    #[error("pattern `{0}` contains an empty segment")]
    EmptySegment(String),
    #[error("pattern `{0}` has a parameter without a name")]
    UnnamedParam(String),
    #[error("pattern `{0}` has a splat that is not the last segment")]
    SplatNotLast(String),
    #[error("pattern `{0}` has an index segment that is not the last segment")]
    IndexNotLast(String),
}

/// Result of matching a pattern against leading path segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixMatch {
    /// Number of path segments consumed.
    pub consumed: usize,
    pub params: Params,
    pub splat_values: Vec<String>,
}

/// A parsed, immutable route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    original: String,
    normalized: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parse a pattern string.
    pub fn parse(original: &str) -> Result<Self, PatternError> {
        let trimmed = original.strip_suffix('/').unwrap_or(original);
        if trimmed.is_empty() {
            return Ok(Self {
                original: original.to_string(),
                normalized: String::new(),
                segments: Vec::new(),
            });
        }

        let rest = trimmed
            .strip_prefix('/')
            .ok_or_else(|| PatternError::MissingLeadingSlash(original.to_string()))?;
        let parts: Vec<&str> = rest.split('/').collect();
        let last = parts.len() - 1;

        let mut segments = Vec::with_capacity(parts.len());
        for (i, part) in parts.iter().enumerate() {
            let segment = match *part {
                "" => return Err(PatternError::EmptySegment(original.to_string())),
                "*" if i != last => return Err(PatternError::SplatNotLast(original.to_string())),
                "*" => Segment::Splat,
                INDEX_SEGMENT if i != last => {
                    return Err(PatternError::IndexNotLast(original.to_string()))
                }
                INDEX_SEGMENT => Segment::Index,
                p if p.starts_with(':') => {
                    let name = &p[1..];
                    if name.is_empty() {
                        return Err(PatternError::UnnamedParam(original.to_string()));
                    }
                    Segment::Param(name.to_string())
                }
                p => Segment::Static(p.to_string()),
            };
            segments.push(segment);
        }

        let normalized = segments
            .iter()
            .map(|s| format!("/{}", s.key()))
            .collect::<String>();

        Ok(Self {
            original: original.to_string(),
            normalized,
            segments,
        })
    }

    /// The pattern exactly as registered.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The pattern with param names erased; used as a cache-key component.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_index(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Index))
    }

    pub fn is_splat(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Splat))
    }

    /// Layouts can wrap other routes; index and splat patterns are always leaves.
    pub fn is_layout(&self) -> bool {
        !self.is_index() && !self.is_splat()
    }

    /// Match this pattern against the leading segments of a path.
    pub fn match_prefix(&self, path: &[&str]) -> Option<PrefixMatch> {
        let mut result = PrefixMatch::default();

        for segment in &self.segments {
            match segment {
                Segment::Static(expected) => {
                    if path.get(result.consumed) != Some(&expected.as_str()) {
                        return None;
                    }
                    result.consumed += 1;
                }
                Segment::Param(name) => {
                    let value = path.get(result.consumed)?;
                    result.params.insert(name.clone(), (*value).to_string());
                    result.consumed += 1;
                }
                Segment::Splat => {
                    result.splat_values = path[result.consumed..]
                        .iter()
                        .map(|s| (*s).to_string())
                        .collect();
                    result.consumed = path.len();
                }
                Segment::Index => {}
            }
        }

        Some(result)
    }

    /// Match this pattern against the whole path.
    pub fn match_full(&self, path: &[&str]) -> Option<PrefixMatch> {
        self.match_prefix(path).filter(|m| m.consumed == path.len())
    }

    /// True when this layout's segments are a strict prefix of `other`'s.
    pub fn is_ancestor_of(&self, other: &RoutePattern) -> bool {
        self.is_layout()
            && self.normalized != other.normalized
            && self.segments.len() <= other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a.key() == b.key())
    }

    /// Specificity used to pick between competing matches; greater wins.
    ///
    /// Non-splat beats splat, then longer fixed prefixes, then static over
    /// dynamic segment by segment, then index leaves over layouts.
    pub fn rank(&self) -> (bool, usize, Vec<u8>, bool) {
        let weights: Vec<u8> = self
            .segments
            .iter()
            .filter_map(|s| match s {
                Segment::Static(_) => Some(2),
                Segment::Param(_) => Some(1),
                Segment::Splat | Segment::Index => None,
            })
            .collect();
        (!self.is_splat(), weights.len(), weights, self.is_index())
    }
}
