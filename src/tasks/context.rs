//! Request and task execution contexts.

use std::borrow::Cow;
use std::str::Utf8Error;
use std::sync::Arc;

use axum::extract::Query;
use axum::http::{header, request::Parts, HeaderMap, Method, Uri};
use percent_encoding::percent_decode_str;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::response::ResponseProxy;
use crate::routing::Params;

/// Query parameter selecting JSON (hydration) mode.
pub const JSON_QUERY_PARAM: &str = "river-json";

/// Per-request context shared (read-only) by every segment task.
///
/// Cheap to clone. Carries the request's cancellation handle: when the client
/// goes away or the request deadline fires, the token is cancelled and
/// in-flight segment tasks stop being awaited.
#[derive(Debug, Clone)]
pub struct RequestCtx {
    inner: Arc<RequestInner>,
}

#[derive(Debug)]
struct RequestInner {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    cancel: CancellationToken,
}

impl RequestCtx {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, cancel: CancellationToken) -> Self {
        Self {
            inner: Arc::new(RequestInner {
                method,
                uri,
                headers,
                cancel,
            }),
        }
    }

    pub fn from_parts(parts: &Parts, cancel: CancellationToken) -> Self {
        Self::new(parts.method.clone(), parts.uri.clone(), parts.headers.clone(), cancel)
    }

    pub fn method(&self) -> &Method {
        &self.inner.method
    }

    pub fn uri(&self) -> &Uri {
        &self.inner.uri
    }

    /// Raw request path, still percent-encoded.
    pub fn path(&self) -> &str {
        self.inner.uri.path()
    }

    /// Percent-decoded path used for route matching. Fails when the decoded
    /// bytes are not UTF-8.
    pub fn decoded_path(&self) -> Result<Cow<'_, str>, Utf8Error> {
        percent_decode_str(self.path()).decode_utf8()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    /// Raw `Cookie` header bytes (empty when absent).
    pub fn cookie_bytes(&self) -> &[u8] {
        self.inner
            .headers
            .get(header::COOKIE)
            .map(|v| v.as_bytes())
            .unwrap_or_default()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.inner.cancel
    }

    /// `?river-json=1` selects JSON mode.
    pub fn is_json_request(&self) -> bool {
        is_json_request(&self.inner.uri)
    }
}

/// Only the first `river-json` value counts; keys and values are
/// form-decoded before comparison.
pub fn is_json_request(uri: &Uri) -> bool {
    let Ok(Query(pairs)) = Query::<Vec<(String, String)>>::try_from_uri(uri) else {
        return false;
    };
    pairs
        .iter()
        .find(|(key, _)| key == JSON_QUERY_PARAM)
        .is_some_and(|(_, value)| value == "1")
}

/// Context owned by one running task.
#[derive(Debug)]
pub struct TaskCtx {
    request: RequestCtx,
    params: Params,
    splat_values: Vec<String>,
    input: Value,
    proxy: ResponseProxy,
}

impl TaskCtx {
    pub fn new(request: RequestCtx, params: Params, splat_values: Vec<String>, input: Value) -> Self {
        Self {
            request,
            params,
            splat_values,
            input,
            proxy: ResponseProxy::new(),
        }
    }

    pub fn request(&self) -> &RequestCtx {
        &self.request
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn splat_values(&self) -> &[String] {
        &self.splat_values
    }

    /// Action input (query or JSON body); `Null` for loaders.
    pub fn input(&self) -> &Value {
        &self.input
    }

    pub fn proxy(&mut self) -> &mut ResponseProxy {
        &mut self.proxy
    }

    pub fn is_cancelled(&self) -> bool {
        self.request.cancellation().is_cancelled()
    }

    pub fn into_proxy(self) -> ResponseProxy {
        self.proxy
    }
}
