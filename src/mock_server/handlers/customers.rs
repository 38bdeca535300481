//! Customer endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tokio::sync::RwLock;

use super::{guard, not_found, paged, PageQuery};
use crate::mock_server::state::MockState;

/// GET /customers
pub async fn list_customers(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if let Some(rejection) = guard(&mut state, &headers) {
        return rejection;
    }

    paged(state.list_customers(), &query).into_response()
}

/// GET /customers/{id}
pub async fn get_customer(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if let Some(rejection) = guard(&mut state, &headers) {
        return rejection;
    }

    match state.get_customer(id) {
        Some(customer) => (StatusCode::OK, Json(customer.clone())).into_response(),
        None => not_found("customer", id),
    }
}
