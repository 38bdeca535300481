//! Project endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{guard, not_found, paged, PageQuery};
use crate::mock_server::state::MockState;

/// Query parameters for listing projects.
#[derive(Debug, Default, Deserialize)]
pub struct ListProjectsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub customer_id: Option<i64>,
}

/// GET /projects
pub async fn list_projects(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(query): Query<ListProjectsQuery>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if let Some(rejection) = guard(&mut state, &headers) {
        return rejection;
    }

    let paging = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    paged(state.list_projects(query.customer_id), &paging).into_response()
}

/// GET /projects/{id}
pub async fn get_project(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if let Some(rejection) = guard(&mut state, &headers) {
        return rejection;
    }

    match state.get_project(id) {
        Some(project) => (StatusCode::OK, Json(project.clone())).into_response(),
        None => not_found("project", id),
    }
}
