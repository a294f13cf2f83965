//! Per-segment response proxy.
//!
//! Every running task owns exactly one [`ResponseProxy`]. Tasks never touch
//! the outgoing response directly; they record what they want here and the
//! merger folds all segments' requests together once the chain has finished.

use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

use crate::head::HeadElement;

/// Terminal signal a segment may raise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MutationStatus {
    #[default]
    Normal,
    Error(StatusCode),
    Redirect { target: String, status: StatusCode },
}

/// Response changes requested by one segment.
#[derive(Debug, Clone, Default)]
pub struct ResponseMutation {
    pub headers: HeaderMap,
    /// `Set-Cookie` values, in the order they were added.
    pub cookies: Vec<HeaderValue>,
    pub status: MutationStatus,
}

impl ResponseMutation {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.cookies.is_empty() && self.status == MutationStatus::Normal
    }
}

/// Recorder handed to a single task.
#[derive(Debug, Clone, Default)]
pub struct ResponseProxy {
    mutation: ResponseMutation,
    head_elements: Vec<HeadElement>,
}

impl ResponseProxy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing any value this segment set before.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.mutation.headers.insert(name, value);
    }

    /// Append a header value without replacing earlier ones.
    pub fn append_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.mutation.headers.append(name, value);
    }

    pub fn add_cookie(&mut self, set_cookie: HeaderValue) {
        self.mutation.cookies.push(set_cookie);
    }

    /// Redirect with `303 See Other`.
    pub fn redirect(&mut self, target: impl Into<String>) {
        self.redirect_with_status(target, StatusCode::SEE_OTHER);
    }

    pub fn redirect_with_status(&mut self, target: impl Into<String>, status: StatusCode) {
        self.mutation.status = MutationStatus::Redirect {
            target: target.into(),
            status,
        };
    }

    pub fn not_found(&mut self) {
        self.mutation.status = MutationStatus::Error(StatusCode::NOT_FOUND);
    }

    pub fn error(&mut self, status: StatusCode) {
        self.mutation.status = MutationStatus::Error(status);
    }

    pub fn add_head_element(&mut self, element: HeadElement) {
        self.head_elements.push(element);
    }

    pub fn add_head_elements(&mut self, elements: impl IntoIterator<Item = HeadElement>) {
        self.head_elements.extend(elements);
    }

    pub fn head_elements(&self) -> &[HeadElement] {
        &self.head_elements
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self.mutation.status, MutationStatus::Redirect { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self.mutation.status, MutationStatus::Error(_))
    }

    /// Split into head elements and the mutation (`None` when untouched).
    pub fn into_parts(self) -> (Vec<HeadElement>, Option<ResponseMutation>) {
        let mutation = (!self.mutation.is_empty()).then_some(self.mutation);
        (self.head_elements, mutation)
    }
}
