//! Easybill API client library.
//!
//! A Rust library for reading customers, documents and projects from the
//! Easybill REST API. Each operation (Get, List) is defined as a trait that
//! resource types implement.
//!
//! # Quick Start
//!
//! ```no_run
//! use easybill_client::{EasybillClient, Customer, Document, Get, List};
//!
//! #[tokio::main]
//! async fn main() -> easybill_client::Result<()> {
//!     // Create client from environment variables
//!     let client = EasybillClient::from_env()?;
//!
//!     // Get a customer by ID
//!     let customer = Customer::get(&client, 42).await?;
//!     println!("Customer: {}", customer.display_name());
//!
//!     // List all documents (every page is fetched)
//!     let documents = Document::list_all(&client, &Default::default()).await?;
//!     println!("Found {} documents", documents.len());
//!
//!     // Invoices of one year
//!     let invoices = easybill_client::get_invoices(
//!         &client,
//!         easybill_client::InvoiceQuery {
//!             year: Some(2025),
//!             ..Default::default()
//!         },
//!     ).await?;
//!     for invoice in invoices {
//!         let number = invoice.number.as_deref().unwrap_or("-");
//!         println!("{} {} EUR", number, invoice.amount_gross_eur());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The library is organized around two core traits:
//!
//! - [`Get`] - Fetch a single resource by ID
//! - [`List`] - Fetch paginated collections of resources
//!
//! List endpoints are drained page by page with [`drain`]. Raw payloads are
//! mapped into immutable records ([`Customer`], [`Document`],
//! [`DocumentItem`], [`Project`]) by tolerant mappers that substitute
//! defaults for missing fields. HTTP failures are classified into
//! [`EasybillError`] kinds.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `EASYBILL_API_KEY` (required) - Your Easybill API key
//! - `EASYBILL_API_URL` (optional) - Base URL (defaults to `https://api.easybill.de/rest/v1/`)
//! - `EASYBILL_TIMEOUT_SECS` (optional) - Request timeout in seconds (defaults to 30)

pub mod cli;
mod client;
mod error;
#[cfg(feature = "test-server")]
pub mod mock_server;
mod models;
pub mod output;
mod pagination;
pub mod payload;
mod traits;

// Re-export core types
pub use client::EasybillClient;
pub use error::{EasybillError, Result};
pub use pagination::{drain, Page, DEFAULT_PAGE_SIZE};
pub use payload::Payload;

// Re-export traits
pub use traits::{Get, List};

// Re-export models
pub use models::{
    // Customer types
    Customer,
    CustomerListQuery,
    // Document types
    Document,
    DocumentItem,
    DocumentListParams,
    DocumentListQuery,
    DocumentType,
    InvoiceQuery,
    // Project types
    Project,
    ProjectListQuery,
};

// Re-export convenience functions
pub use models::{get_customer, get_customers};
pub use models::{get_document, get_document_pdf, get_documents, get_invoices};
pub use models::{get_project, get_projects};
