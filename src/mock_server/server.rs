//! In-process Easybill API for end-to-end tests.
//!
//! Serves the customer, document and project endpoints from a
//! [`MockState`] on a loopback port picked by the OS.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::{oneshot, RwLock};
use tokio::task::JoinHandle;

use super::fixtures::Fixtures;
use super::handlers;
use super::state::MockState;

/// How long `shutdown` waits for open connections to finish.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// A running mock Easybill API.
///
/// Point an `EasybillClient` at [`url`](Self::url). The served data lives in
/// a shared [`MockState`] that tests may change while the server runs.
pub struct MockServer {
    addr: SocketAddr,
    url: String,
    state: Arc<RwLock<MockState>>,
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl MockServer {
    /// Serve the default scenario (three customers, four documents, two
    /// projects and one PDF).
    pub async fn start() -> Self {
        Self::with_state(MockState::from(Fixtures::default_scenario())).await
    }

    /// Serve no data at all.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Serve `state`.
    ///
    /// # Panics
    ///
    /// Panics if no loopback port can be bound.
    pub async fn with_state(state: MockState) -> Self {
        let state = state.shared();

        let listener = TcpListener::bind(("127.0.0.1", 0))
            .await
            .expect("mock server: bind loopback port");
        let addr = listener
            .local_addr()
            .expect("mock server: read bound address");

        let (stop, stopped) = oneshot::channel::<()>();
        let app = routes(state.clone());
        let task = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = stopped.await;
                })
                .await;
            if let Err(e) = served {
                tracing::warn!(error = %e, "mock server stopped with an error");
            }
        });

        tracing::debug!(%addr, "mock Easybill API listening");
        Self {
            addr,
            url: format!("http://{addr}"),
            state,
            stop,
            task,
        }
    }

    /// Base URL, e.g. `http://127.0.0.1:54321`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Socket the server is bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Handle to the served data.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        Arc::clone(&self.state)
    }

    /// Number of API requests served so far (health checks excluded).
    pub async fn request_count(&self) -> usize {
        self.state.read().await.request_count
    }

    /// Stop accepting connections and wait for the server task to end.
    ///
    /// Connections still open after two seconds are dropped.
    pub async fn shutdown(mut self) {
        let _ = self.stop.send(());
        if tokio::time::timeout(SHUTDOWN_GRACE, &mut self.task)
            .await
            .is_err()
        {
            self.task.abort();
        }
    }
}

fn routes(state: Arc<RwLock<MockState>>) -> Router {
    Router::new()
        .route("/customers", get(handlers::list_customers))
        .route("/customers/:id", get(handlers::get_customer))
        .route("/documents", get(handlers::list_documents))
        .route("/documents/:id", get(handlers::get_document))
        .route("/documents/:id/pdf", get(handlers::get_document_pdf))
        .route("/projects", get(handlers::list_projects))
        .route("/projects/:id", get(handlers::get_project))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Customer, EasybillClient, Get, List};

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        // Server should be accessible
        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_get_customer_with_client() {
        let server = MockServer::start().await;
        let client = EasybillClient::new("test-token", server.url()).unwrap();

        let customer = Customer::get(&client, 1001)
            .await
            .expect("Failed to get customer");

        assert_eq!(customer.display_name(), "Acme GmbH");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_list_customers_with_client() {
        let server = MockServer::start().await;
        let client = EasybillClient::new("test-token", server.url()).unwrap();

        let page = Customer::list_page(&client, &Default::default(), 1, 2)
            .await
            .expect("Failed to list customers");

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages, 2);
        assert!(page.has_more);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_url_matches_bound_address() {
        let server = MockServer::start_empty().await;

        assert_eq!(server.url(), format!("http://{}", server.addr()));
        assert!(server.addr().ip().is_loopback());

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server() {
        let server = MockServer::start_empty().await;
        let client = EasybillClient::new("test-token", server.url()).unwrap();

        let result = Customer::get(&client, 1).await;

        assert!(result.unwrap_err().is_not_found());

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_custom_state() {
        let state =
            MockState::new().with_customer(Fixtures::person_customer(77, "Ada", "Lovelace"));

        let server = MockServer::with_state(state).await;
        let client = EasybillClient::new("test-token", server.url()).unwrap();

        let customer = Customer::get(&client, 77)
            .await
            .expect("Failed to get customer");

        assert_eq!(customer.display_name(), "Ada Lovelace");

        server.shutdown().await;
    }
}
