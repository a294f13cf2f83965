//! Response-mutation merging.
//!
//! # Rules
//! - Walk segments outermost → innermost, skipping segments with no mutation
//! - Headers: last writer per key wins (innermost wins ties)
//! - Cookies: concatenated, no dedupe
//! - The first segment that signals an error or a redirect stops the walk;
//!   its own headers/cookies still apply, more specific segments' do not
//! - Error classification collapses to 404 (not found) or 500 (anything else)

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::response::proxy::{MutationStatus, ResponseMutation};

/// Net classification of the merged chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResponseOutcome {
    #[default]
    Normal,
    Error(StatusCode),
    Redirect { target: String, status: StatusCode },
}

/// One net decision derived from all segments' mutations.
#[derive(Debug, Clone, Default)]
pub struct MergedResponse {
    headers: HeaderMap,
    cookies: Vec<HeaderValue>,
    outcome: ResponseOutcome,
}

/// Fold per-segment mutations (outermost first) into one decision.
pub fn merge_mutations<'a, I>(mutations: I) -> MergedResponse
where
    I: IntoIterator<Item = Option<&'a ResponseMutation>>,
{
    let mut merged = MergedResponse::default();

    for mutation in mutations.into_iter().flatten() {
        for name in mutation.headers.keys() {
            merged.headers.remove(name);
            for value in mutation.headers.get_all(name) {
                merged.headers.append(name.clone(), value.clone());
            }
        }
        merged.cookies.extend(mutation.cookies.iter().cloned());

        match &mutation.status {
            MutationStatus::Normal => {}
            MutationStatus::Error(status) => {
                let status = if *status == StatusCode::NOT_FOUND {
                    StatusCode::NOT_FOUND
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                merged.outcome = ResponseOutcome::Error(status);
                break;
            }
            MutationStatus::Redirect { target, status } => {
                merged.outcome = ResponseOutcome::Redirect {
                    target: target.clone(),
                    status: *status,
                };
                break;
            }
        }
    }

    merged
}

impl MergedResponse {
    pub fn outcome(&self) -> &ResponseOutcome {
        &self.outcome
    }

    /// Error and redirect outcomes skip all further body work.
    pub fn is_terminal(&self) -> bool {
        self.outcome != ResponseOutcome::Normal
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn cookies(&self) -> &[HeaderValue] {
        &self.cookies
    }

    /// Write merged headers and cookies onto an outgoing header map.
    pub fn apply_to(&self, headers: &mut HeaderMap) {
        for name in self.headers.keys() {
            headers.remove(name);
            for value in self.headers.get_all(name) {
                headers.append(name.clone(), value.clone());
            }
        }
        for cookie in &self.cookies {
            headers.append(header::SET_COOKIE, cookie.clone());
        }
    }
}

impl IntoResponse for MergedResponse {
    fn into_response(self) -> Response {
        let mut response = match &self.outcome {
            ResponseOutcome::Normal => Response::new(Body::empty()),
            ResponseOutcome::Error(status) => {
                let reason = status.canonical_reason().unwrap_or("Error");
                (*status, reason).into_response()
            }
            ResponseOutcome::Redirect { target, status } => match HeaderValue::try_from(target.as_str()) {
                Ok(location) => {
                    let mut response = Response::new(Body::empty());
                    *response.status_mut() = *status;
                    response.headers_mut().insert(header::LOCATION, location);
                    response
                }
                Err(e) => {
                    tracing::error!(target = %target, error = %e, "Invalid redirect target");
                    return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
                }
            },
        };
        self.apply_to(response.headers_mut());
        response
    }
}
