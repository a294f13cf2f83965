//! Action handler: GET/POST under the actions mount, JSON in and out.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::body::{to_bytes, Body};
use axum::extract::{Query, State};
use axum::http::{request::Parts, Method, Request, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::framework::ActionOutcome;
use crate::http::response::{apply_nosniff, set_build_id};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::tasks::RequestCtx;

pub async fn actions_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();
    let river = &state.river;

    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();
    let ctx = RequestCtx::from_parts(&parts, cancel);

    let mut response = match read_input(&parts, body, river.options().max_body_size).await {
        Err(rejection) => rejection,
        Ok(input) => match river.actions().dispatch(&ctx, input).await {
            ActionOutcome::NotFound => StatusCode::NOT_FOUND.into_response(),
            ActionOutcome::InvalidPath => StatusCode::BAD_REQUEST.into_response(),
            ActionOutcome::Completed { merged, .. } if merged.is_terminal() => merged.into_response(),
            ActionOutcome::Completed { result: Ok(value), merged } => {
                let mut response = Json(value).into_response();
                merged.apply_to(response.headers_mut());
                response
            }
            ActionOutcome::Completed { result: Err(e), .. } => {
                tracing::error!(path = %ctx.path(), error = %e, "Action failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        },
    };

    set_build_id(response.headers_mut(), river.build_id());
    if river.options().enable_headers {
        apply_nosniff(response.headers_mut());
    }
    metrics::record_request("action", response.status().as_u16(), start);
    response
}

/// Query string for GET, JSON body for POST (`null` when empty).
async fn read_input(parts: &Parts, body: Body, limit: usize) -> Result<Value, Response> {
    if parts.method == Method::GET {
        let Query(query) = Query::<BTreeMap<String, String>>::try_from_uri(&parts.uri)
            .map_err(|e| (StatusCode::BAD_REQUEST, e.body_text()).into_response())?;
        return Ok(Value::Object(query.into_iter().map(|(k, v)| (k, Value::String(v))).collect()));
    }

    let bytes = to_bytes(body, limit).await.map_err(|e| {
        tracing::warn!(path = %parts.uri.path(), limit, error = %e, "Action body rejected");
        StatusCode::PAYLOAD_TOO_LARGE.into_response()
    })?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid JSON body: {e}")).into_response())
}
