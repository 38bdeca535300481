//! Mock Easybill API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Easybill
//! API for integration and end-to-end testing. Unlike wiremock which mocks at
//! the HTTP level per-test, this server keeps its data across requests and
//! pages list endpoints the way the real API does (`limit`, `page`,
//! `pages`), enabling realistic workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use easybill_client::mock_server::MockServer;
//! use easybill_client::{EasybillClient, Customer, Get};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = EasybillClient::new("test-token", server.url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let customer = Customer::get(&client, 1001).await.unwrap();
//!     assert_eq!(customer.display_name(), "Acme GmbH");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::MockState;
