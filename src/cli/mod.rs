//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the easybill binary.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use crate::{DocumentListQuery, DocumentType};

/// Easybill API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "easybill", about = "Easybill API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single resource by ID.
    Get {
        /// The type of resource to get.
        resource: Resource,

        /// The numeric resource ID.
        id: i64,

        /// Leave out document line items.
        #[arg(long)]
        without_items: bool,
    },

    /// List resources with optional filtering.
    List {
        /// The type of resource to list.
        resource: Resource,

        /// Fetch only this page instead of all pages.
        #[arg(long)]
        page: Option<u32>,

        /// Number of items per page.
        #[arg(long, default_value_t = crate::DEFAULT_PAGE_SIZE)]
        limit: u32,

        /// Document type (invoice, credit, offer, order, recurring, ...).
        #[arg(long = "type", value_parser = parse_document_type)]
        document_type: Option<DocumentType>,

        /// Earliest document date (YYYY-MM-DD).
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Latest document date (YYYY-MM-DD); requires --from.
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,

        /// Only resources of this customer.
        #[arg(long)]
        customer: Option<i64>,

        /// Document status filter.
        #[arg(long)]
        status: Option<String>,
    },

    /// Download the PDF of a document.
    Pdf {
        /// The document ID.
        id: i64,

        /// Where to write the PDF (defaults to `<id>.pdf`).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// Resource types that can be operated on.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum Resource {
    /// A customer.
    #[value(alias = "customers")]
    Customer,
    /// A document (invoice, credit note, offer, ...).
    #[value(alias = "documents")]
    Document,
    /// A project.
    #[value(alias = "projects")]
    Project,
}

fn parse_document_type(raw: &str) -> Result<DocumentType, String> {
    let normalized = raw.trim().to_ascii_uppercase();
    if normalized.is_empty() {
        return Err("document type must not be empty".to_string());
    }
    Ok(normalized.parse().unwrap_or_default())
}

impl Command {
    /// Document filters from the `list` arguments.
    ///
    /// Returns `None` for the other subcommands.
    pub fn document_query(&self) -> Option<DocumentListQuery> {
        match self {
            Command::List {
                document_type,
                from,
                to,
                customer,
                status,
                ..
            } => Some(DocumentListQuery {
                document_type: document_type.clone(),
                start_date: *from,
                end_date: *to,
                customer_id: *customer,
                status: status.clone(),
                with_items: false,
            }),
            _ => None,
        }
    }
}
