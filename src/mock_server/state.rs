//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Easybill API server.
//! Records are stored as raw payloads, exactly as the API would send them.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::fixtures::DefaultScenario;
use crate::payload::{self, Payload};

/// Filters accepted by the documents list endpoint.
#[derive(Debug, Default, Clone)]
pub struct DocumentFilter {
    pub document_type: Option<String>,
    pub customer_id: Option<i64>,
    pub status: Option<String>,
    /// `START` or `START,END` as sent on the wire.
    pub document_date: Option<String>,
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Customers indexed by ID.
    pub customers: BTreeMap<i64, Payload>,

    /// Documents indexed by ID.
    pub documents: BTreeMap<i64, Payload>,

    /// Projects indexed by ID.
    pub projects: BTreeMap<i64, Payload>,

    /// PDF renderings indexed by document ID.
    pub pdfs: HashMap<i64, Vec<u8>>,

    /// Optional authentication token. If set, requests must include this token.
    pub required_token: Option<String>,

    /// If set, every API request fails with this status.
    pub forced_status: Option<u16>,

    /// Number of API requests served (health checks excluded).
    pub request_count: usize,
}

fn id_of(record: &Payload) -> i64 {
    payload::int_or(record, "id", 0)
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a customer payload to the state.
    pub fn with_customer(mut self, customer: Payload) -> Self {
        self.customers.insert(id_of(&customer), customer);
        self
    }

    /// Add a document payload to the state.
    pub fn with_document(mut self, document: Payload) -> Self {
        self.documents.insert(id_of(&document), document);
        self
    }

    /// Add a project payload to the state.
    pub fn with_project(mut self, project: Payload) -> Self {
        self.projects.insert(id_of(&project), project);
        self
    }

    /// Add a PDF rendering for a document.
    pub fn with_pdf(mut self, document_id: i64, bytes: Vec<u8>) -> Self {
        self.pdfs.insert(document_id, bytes);
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Make every API request fail with `status`.
    pub fn with_forced_status(mut self, status: u16) -> Self {
        self.forced_status = Some(status);
        self
    }

    pub fn get_customer(&self, id: i64) -> Option<&Payload> {
        self.customers.get(&id)
    }

    pub fn get_document(&self, id: i64) -> Option<&Payload> {
        self.documents.get(&id)
    }

    pub fn get_project(&self, id: i64) -> Option<&Payload> {
        self.projects.get(&id)
    }

    pub fn get_pdf(&self, document_id: i64) -> Option<&Vec<u8>> {
        self.pdfs.get(&document_id)
    }

    /// List all customers in ID order.
    pub fn list_customers(&self) -> Vec<&Payload> {
        self.customers.values().collect()
    }

    /// List documents matching the filter, in ID order.
    pub fn list_documents(&self, filter: &DocumentFilter) -> Vec<&Payload> {
        let (from, to) = match filter.document_date.as_deref() {
            Some(range) => match range.split_once(',') {
                Some((from, to)) => (Some(from), Some(to)),
                None => (Some(range), None),
            },
            None => (None, None),
        };

        self.documents
            .values()
            .filter(|d| {
                filter
                    .document_type
                    .as_deref()
                    .map_or(true, |t| payload::string(d, "type").as_deref() == Some(t))
            })
            .filter(|d| {
                filter
                    .customer_id
                    .map_or(true, |c| payload::int(d, "customer_id") == Some(c))
            })
            .filter(|d| {
                filter
                    .status
                    .as_deref()
                    .map_or(true, |s| payload::string(d, "status").as_deref() == Some(s))
            })
            .filter(|d| {
                // ISO dates compare correctly as strings
                let date = payload::string(d, "document_date").unwrap_or_default();
                from.map_or(true, |f| date.as_str() >= f) && to.map_or(true, |t| date.as_str() <= t)
            })
            .collect()
    }

    /// List projects, optionally of one customer, in ID order.
    pub fn list_projects(&self, customer_id: Option<i64>) -> Vec<&Payload> {
        self.projects
            .values()
            .filter(|p| customer_id.map_or(true, |c| payload::int(p, "customer_id") == Some(c)))
            .collect()
    }
}

impl From<DefaultScenario> for MockState {
    fn from(scenario: DefaultScenario) -> Self {
        let state = scenario
            .customers
            .into_iter()
            .fold(Self::new(), Self::with_customer);
        let state = scenario
            .documents
            .into_iter()
            .fold(state, Self::with_document);
        let state = scenario
            .projects
            .into_iter()
            .fold(state, Self::with_project);
        scenario
            .pdfs
            .into_iter()
            .fold(state, |state, (id, bytes)| state.with_pdf(id, bytes))
    }
}
