//! CLI argument parsing tests.

use chrono::NaiveDate;
use clap::Parser;
use easybill_client::cli::{Cli, Command, Resource};
use easybill_client::DocumentType;

#[test]
fn test_cli_parses_get_subcommand() {
    let cli = Cli::parse_from(["easybill", "get", "customer", "42"]);

    assert!(!cli.json);
    match cli.command {
        Command::Get {
            resource,
            id,
            without_items,
        } => {
            assert!(matches!(resource, Resource::Customer));
            assert_eq!(id, 42);
            assert!(!without_items);
        }
        _ => panic!("Expected Get command"),
    }
}

#[test]
fn test_cli_rejects_non_numeric_id() {
    let result = Cli::try_parse_from(["easybill", "get", "document", "RE-1"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_parses_list_subcommand() {
    let cli = Cli::parse_from(["easybill", "list", "documents"]);

    match cli.command {
        Command::List {
            resource,
            page,
            limit,
            ..
        } => {
            assert!(matches!(resource, Resource::Document));
            assert_eq!(page, None);
            assert_eq!(limit, 1000);
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_global_json_flag() {
    // --json before subcommand
    let cli = Cli::parse_from(["easybill", "--json", "list", "customers"]);
    assert!(cli.json);

    // --json after subcommand (global flag)
    let cli = Cli::parse_from(["easybill", "list", "customers", "--json"]);
    assert!(cli.json);
}

#[test]
fn test_list_document_filters() {
    let cli = Cli::parse_from([
        "easybill",
        "list",
        "documents",
        "--type",
        "invoice",
        "--from",
        "2025-01-01",
        "--to",
        "2025-12-31",
        "--customer",
        "7",
        "--status",
        "DONE",
        "--limit",
        "250",
    ]);

    let query = cli.command.document_query().expect("list has a document query");
    assert_eq!(query.document_type, Some(DocumentType::Invoice));
    assert_eq!(query.start_date, NaiveDate::from_ymd_opt(2025, 1, 1));
    assert_eq!(query.end_date, NaiveDate::from_ymd_opt(2025, 12, 31));
    assert_eq!(query.customer_id, Some(7));
    assert_eq!(query.status.as_deref(), Some("DONE"));

    match cli.command {
        Command::List { limit, .. } => assert_eq!(limit, 250),
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_unknown_document_type_passes_through() {
    let cli = Cli::parse_from(["easybill", "list", "documents", "--type", "delivery"]);
    let query = cli.command.document_query().unwrap();
    assert_eq!(
        query.document_type,
        Some(DocumentType::Other("DELIVERY".to_string()))
    );
}

#[test]
fn test_to_requires_from() {
    let result = Cli::try_parse_from(["easybill", "list", "documents", "--to", "2025-12-31"]);
    assert!(result.is_err());
}

#[test]
fn test_pdf_subcommand() {
    let cli = Cli::parse_from(["easybill", "pdf", "5001", "-o", "invoice.pdf"]);
    match cli.command {
        Command::Pdf { id, output } => {
            assert_eq!(id, 5001);
            assert_eq!(output.unwrap().to_str(), Some("invoice.pdf"));
        }
        _ => panic!("Expected Pdf command"),
    }
    assert!(Cli::parse_from(["easybill", "pdf", "1"]).command.document_query().is_none());
}

#[test]
fn test_resource_variants() {
    let cli = Cli::parse_from(["easybill", "get", "project", "3"]);
    assert!(matches!(cli.command, Command::Get { resource: Resource::Project, .. }));

    let cli = Cli::parse_from(["easybill", "list", "projects", "--customer", "1"]);
    assert!(matches!(cli.command, Command::List { resource: Resource::Project, .. }));

    let cli = Cli::parse_from(["easybill", "get", "document", "9", "--without-items"]);
    assert!(matches!(
        cli.command,
        Command::Get {
            resource: Resource::Document,
            without_items: true,
            ..
        }
    ));
}
