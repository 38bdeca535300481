//! HTTP request handlers for the mock server.

pub mod customers;
pub mod documents;
pub mod projects;

pub use customers::*;
pub use documents::*;
pub use projects::*;

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::mock_server::state::MockState;
use crate::payload::Payload;

/// Paging parameters shared by all list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Reject the request if the token is wrong or a failure is forced.
///
/// Counts every request that reaches this check.
pub(crate) fn guard(state: &mut MockState, headers: &HeaderMap) -> Option<Response> {
    state.request_count += 1;

    if let Some(required) = &state.required_token {
        let expected = format!("Bearer {required}");
        let provided = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        if provided != Some(expected.as_str()) {
            return Some(error_response(StatusCode::UNAUTHORIZED, "Invalid API key"));
        }
    }

    if let Some(status) = state.forced_status {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return Some(error_response(status, "Forced failure"));
    }

    None
}

/// Slice `records` into the requested page and wrap it in the list envelope.
pub(crate) fn paged(records: Vec<&Payload>, query: &PageQuery) -> Json<Value> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(100).clamp(1, 1000);

    let total = records.len();
    let pages = total.div_ceil(limit as usize).max(1);
    let start = (page as usize - 1) * limit as usize;

    let items: Vec<&Payload> = records.into_iter().skip(start).take(limit as usize).collect();

    Json(json!({
        "page": page,
        "pages": pages,
        "limit": limit,
        "total": total,
        "items": items,
    }))
}

pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "code": status.as_u16(),
            "message": message
        })),
    )
        .into_response()
}

pub(crate) fn not_found(resource: &str, id: i64) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        &format!("No {resource} found with id {id}"),
    )
}
