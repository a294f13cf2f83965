//! UI entry point: one handler for HTML documents and hydration JSON.
//!
//! # Data Flow
//! ```text
//! Request
//!     → RequestCtx (+ cancellation token, cancelled when this future drops)
//!     → River::ui_route_data
//!         ├─ Terminal → redirect / 404 / 500, nothing rendered
//!         └─ Ready    → merged headers + cache policy
//!                         ├─ ?river-json=1 → JSON (+ ETag, 304)
//!                         └─ otherwise      → head ∥ SSR script → root template
//! ```

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::RiverError;
use crate::framework::{body_scripts, head_section, render_ssr_script, DocumentParts, River, UIRouteOutput, UiRouteData};
use crate::head::HeadBlocks;
use crate::http::response::{apply_cache_policy, apply_nosniff, content_security_policy, set_build_id};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::response::{should_return_304_conservative, to_quoted_sha256_etag};
use crate::tasks::RequestCtx;

pub async fn ui_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, _body) = request.into_parts();

    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();
    let ctx = RequestCtx::from_parts(&parts, cancel);
    let mode = if ctx.is_json_request() { "json" } else { "html" };

    let mut response = if parts.method != Method::GET && parts.method != Method::HEAD {
        StatusCode::METHOD_NOT_ALLOWED.into_response()
    } else {
        match serve(&state.river, &ctx).await {
            Ok(response) => response,
            Err(e) => {
                if !matches!(e, RiverError::NotFound | RiverError::InvalidPath) {
                    tracing::error!(path = %ctx.path(), error = %e, "UI request failed");
                }
                e.into_response()
            }
        }
    };

    set_build_id(response.headers_mut(), state.river.build_id());
    metrics::record_request(mode, response.status().as_u16(), start);
    response
}

async fn serve(river: &Arc<River>, ctx: &RequestCtx) -> Result<Response, RiverError> {
    let (output, merged) = match river.ui_route_data(ctx).await? {
        UiRouteData::Terminal(merged) => return Ok(merged.into_response()),
        UiRouteData::Ready { output, merged } => (output, merged),
    };

    let is_json = ctx.is_json_request();
    let mut headers = HeaderMap::new();
    merged.apply_to(&mut headers);
    apply_cache_policy(&mut headers, is_json);
    if river.options().enable_headers {
        apply_nosniff(&mut headers);
    }

    if is_json {
        render_json(river, ctx, &output, headers)
    } else {
        render_html(river, output, headers).await
    }
}

fn render_json(river: &River, ctx: &RequestCtx, output: &UIRouteOutput, mut headers: HeaderMap) -> Result<Response, RiverError> {
    let body = serde_json::to_vec(output)?;

    if river.options().auto_etags {
        let cookie = ctx.cookie_bytes();
        let max = river.options().max_etag_cookie_bytes;
        if cookie.len() > max {
            return Err(RiverError::OversizedCookie { len: cookie.len(), max });
        }

        let mut digest_input = Vec::with_capacity(cookie.len() + body.len());
        digest_input.extend_from_slice(cookie);
        digest_input.extend_from_slice(&body);
        let etag = to_quoted_sha256_etag(&digest_input);
        headers.insert(header::ETAG, HeaderValue::from_str(&etag)?);

        if should_return_304_conservative(ctx.method(), ctx.headers(), &etag) {
            return Ok((StatusCode::NOT_MODIFIED, headers).into_response());
        }
    }

    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok((StatusCode::OK, headers, body).into_response())
}

async fn render_html(river: &Arc<River>, output: Box<UIRouteOutput>, mut headers: HeaderMap) -> Result<Response, RiverError> {
    let output: Arc<UIRouteOutput> = Arc::from(output);

    let head_task: JoinHandle<Result<(String, Vec<String>), RiverError>> = {
        let river = Arc::clone(river);
        let output = Arc::clone(&output);
        tokio::spawn(async move {
            let blocks = HeadBlocks {
                title: output.title.clone(),
                meta: output.meta.clone(),
                rest: output.rest.clone(),
            };
            let rendered = river.head_renderer().render(&blocks);
            let section = head_section(&rendered.html, river.manifest(), &river.options().public_path_prefix);
            Ok::<_, RiverError>((section, rendered.inline_script_sources))
        })
    };
    let ssr_task = {
        let river = Arc::clone(river);
        let output = Arc::clone(&output);
        tokio::spawn(async move { Ok::<_, RiverError>(render_ssr_script(&output, &river.ssr_context())?) })
    };

    let aborts = [head_task.abort_handle(), ssr_task.abort_handle()];
    let ((head, inline_sources), ssr) = tokio::try_join!(flatten(head_task), flatten(ssr_task)).inspect_err(|_| {
        for handle in &aborts {
            handle.abort();
        }
    })?;

    let options = river.options();
    let parts = DocumentParts {
        head,
        ssr_script: ssr.html.clone(),
        ssr_script_sha256: ssr.sha256_hash.clone(),
        root_id: options.root_id.clone(),
        body_scripts: body_scripts(river.manifest(), &options.public_path_prefix, options.active_vite_dev_url()),
    };
    let html = river.root_template().render(&parts)?;

    if options.enable_headers {
        let csp = content_security_policy(&ssr.csp_source(), &inline_sources, options.active_vite_dev_url());
        headers.insert(header::CONTENT_SECURITY_POLICY, HeaderValue::from_str(&csp)?);
    }
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
    Ok((StatusCode::OK, headers, html).into_response())
}

async fn flatten<T>(handle: JoinHandle<Result<T, RiverError>>) -> Result<T, RiverError> {
    handle.await?
}
