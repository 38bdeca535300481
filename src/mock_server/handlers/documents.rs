//! Document endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{guard, not_found, paged, PageQuery};
use crate::mock_server::state::{DocumentFilter, MockState};

/// Query parameters for listing documents.
#[derive(Debug, Default, Deserialize)]
pub struct ListDocumentsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(rename = "type")]
    pub document_type: Option<String>,
    pub customer_id: Option<i64>,
    pub status: Option<String>,
    pub document_date: Option<String>,
}

/// GET /documents
pub async fn list_documents(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(query): Query<ListDocumentsQuery>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if let Some(rejection) = guard(&mut state, &headers) {
        return rejection;
    }

    let filter = DocumentFilter {
        document_type: query.document_type,
        customer_id: query.customer_id,
        status: query.status,
        document_date: query.document_date,
    };
    let paging = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    paged(state.list_documents(&filter), &paging).into_response()
}

/// GET /documents/{id}
pub async fn get_document(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if let Some(rejection) = guard(&mut state, &headers) {
        return rejection;
    }

    match state.get_document(id) {
        Some(document) => (StatusCode::OK, Json(document.clone())).into_response(),
        None => not_found("document", id),
    }
}

/// GET /documents/{id}/pdf
pub async fn get_document_pdf(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if let Some(rejection) = guard(&mut state, &headers) {
        return rejection;
    }

    match state.get_pdf(id) {
        Some(bytes) => (
            StatusCode::OK,
            [(CONTENT_TYPE, "application/pdf")],
            bytes.clone(),
        )
            .into_response(),
        None => not_found("document", id),
    }
}
