//! Easybill API CLI binary.
//!
//! A command-line interface for reading data from the Easybill API.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use easybill_client::cli::{Cli, Command, Resource};
use easybill_client::output::PrettyPrint;
use easybill_client::{
    get_document_pdf, Customer, Document, EasybillClient, EasybillError, Get, List, Page,
    Project, ProjectListQuery,
};
use serde::Serialize;
use tabled::{Table, Tabled};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match EasybillClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set EASYBILL_API_KEY environment variable");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if e.is_rate_limited() {
                eprintln!("Hint: Easybill rate limit reached, try again in a minute");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &EasybillClient, cli: Cli) -> easybill_client::Result<()> {
    let document_query = cli.command.document_query();

    match cli.command {
        Command::Get {
            resource,
            id,
            without_items,
        } => handle_get(client, resource, id, !without_items, cli.json).await,
        Command::List {
            resource,
            page,
            limit,
            customer,
            ..
        } => {
            let document_query = document_query.unwrap_or_default();
            match resource {
                Resource::Customer => {
                    list::<Customer, _, _>(client, &Default::default(), page, limit, cli.json, |c| {
                        CustomerRow::from(c)
                    })
                    .await
                }
                Resource::Document => {
                    list::<Document, _, _>(client, &document_query, page, limit, cli.json, |d| {
                        DocumentRow::from(d)
                    })
                    .await
                }
                Resource::Project => {
                    let query = ProjectListQuery {
                        customer_id: customer,
                    };
                    list::<Project, _, _>(client, &query, page, limit, cli.json, |p| {
                        ProjectRow::from(p)
                    })
                    .await
                }
            }
        }
        Command::Pdf { id, output } => handle_pdf(client, id, output).await,
    }
}

async fn handle_get(
    client: &EasybillClient,
    resource: Resource,
    id: i64,
    with_items: bool,
    json: bool,
) -> easybill_client::Result<()> {
    match resource {
        Resource::Customer => {
            let customer = Customer::get(client, id).await?;
            output_single(&customer, json)?;
        }
        Resource::Document => {
            let document = Document::get_with_items(client, id, with_items).await?;
            output_single(&document, json)?;
        }
        Resource::Project => {
            let project = Project::get(client, id).await?;
            output_single(&project, json)?;
        }
    }
    Ok(())
}

/// List one page when `page` is given, otherwise every page.
async fn list<T, R, F>(
    client: &EasybillClient,
    query: &T::Query,
    page: Option<u32>,
    limit: u32,
    json: bool,
    to_row: F,
) -> easybill_client::Result<()>
where
    T: List + Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    match page {
        Some(page) => {
            let page = T::list_page(client, query, page, limit).await?;
            output_page(&page, json, to_row)
        }
        None => {
            let items = T::list_all_with_limit(client, query, limit).await?;
            output_list(&items, json, to_row)
        }
    }
}

async fn handle_pdf(
    client: &EasybillClient,
    id: i64,
    output: Option<PathBuf>,
) -> easybill_client::Result<()> {
    let bytes = get_document_pdf(client, id).await?;
    let path = output.unwrap_or_else(|| PathBuf::from(format!("{id}.pdf")));

    std::fs::write(&path, &bytes).map_err(|e| EasybillError::Api {
        message: format!("Failed to write {}: {e}", path.display()),
        status_code: None,
        body: None,
    })?;

    eprintln!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> easybill_client::Result<()> {
    if json {
        println!("{}", to_json(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_list<T, R, F>(items: &[T], json: bool, to_row: F) -> easybill_client::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", to_json(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} total items", items.len());
    }
    Ok(())
}

fn output_page<T, R, F>(page: &Page<T>, json: bool, to_row: F) -> easybill_client::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", to_json(&page.items)?);
    } else {
        let rows: Vec<R> = page.items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        if page.has_more {
            println!("\nPage {}/{} (more available)", page.page, page.total_pages);
        } else {
            println!("\nPage {}/{} (end)", page.page, page.total_pages);
        }
    }
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> easybill_client::Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| EasybillError::Api {
        message: format!("Failed to serialize output: {e}"),
        status_code: None,
        body: None,
    })
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct CustomerRow {
    id: i64,
    number: String,
    name: String,
    email: String,
}

impl From<&Customer> for CustomerRow {
    fn from(c: &Customer) -> Self {
        Self {
            id: c.id,
            number: c.number.clone().unwrap_or_default(),
            name: c.display_name(),
            email: c.primary_email().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Tabled)]
struct DocumentRow {
    id: i64,
    #[tabled(rename = "type")]
    document_type: String,
    number: String,
    date: String,
    gross: String,
    paid: String,
}

impl From<&Document> for DocumentRow {
    fn from(d: &Document) -> Self {
        Self {
            id: d.id,
            document_type: d.document_type.to_string(),
            number: d.number.clone().unwrap_or_default(),
            date: d
                .document_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            gross: format!("{} {}", d.amount_gross_eur(), d.currency),
            paid: if d.is_paid() { "yes" } else { "no" }.to_string(),
        }
    }
}

#[derive(Tabled)]
struct ProjectRow {
    id: i64,
    name: String,
    status: String,
    customer: String,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            status: p.status.clone().unwrap_or_default(),
            customer: p.customer_id.map(|c| c.to_string()).unwrap_or_default(),
        }
    }
}
