//! Test data fixtures for the mock server.
//!
//! Provides factory functions for realistic raw API payloads.

use serde_json::{json, Value};

use crate::payload::Payload;

/// Collection of fixture factories for test data.
pub struct Fixtures;

fn object(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        _ => Payload::new(),
    }
}

impl Fixtures {
    // =========================================================================
    // Customer Fixtures
    // =========================================================================

    /// A business customer with one email address.
    pub fn company_customer(id: i64, company_name: &str) -> Payload {
        object(json!({
            "id": id,
            "number": format!("K-{id}"),
            "company_name": company_name,
            "first_name": null,
            "last_name": null,
            "emails_1": format!("billing@customer{id}.test"),
            "emails_2": "",
            "emails_3": null,
            "street": "Hauptstraße 1",
            "zip_code": "10115",
            "city": "Berlin",
            "country": "DE",
            "vat_identifier": "DE123456789",
            "payment_options": 1
        }))
    }

    /// A private customer without a company name.
    pub fn person_customer(id: i64, first_name: &str, last_name: &str) -> Payload {
        object(json!({
            "id": id,
            "number": format!("K-{id}"),
            "company_name": "",
            "first_name": first_name,
            "last_name": last_name,
            "country": "DE"
        }))
    }

    // =========================================================================
    // Document Fixtures
    // =========================================================================

    /// A document of any type without amounts.
    pub fn document(
        id: i64,
        document_type: &str,
        customer_id: i64,
        document_date: &str,
    ) -> Payload {
        object(json!({
            "id": id,
            "type": document_type,
            "number": null,
            "document_date": document_date,
            "status": null,
            "customer_id": customer_id,
            "project_id": null,
            "amount_net": 0,
            "amount": 0,
            "currency": "EUR",
            "is_draft": true,
            "items": []
        }))
    }

    /// A finalized, unpaid invoice with one line item at 19% VAT.
    pub fn invoice(
        id: i64,
        customer_id: i64,
        document_date: &str,
        amount_net_cents: i64,
    ) -> Payload {
        let gross = amount_net_cents * 119 / 100;
        let mut invoice = Self::document(id, "INVOICE", customer_id, document_date);
        invoice.extend(object(json!({
            "number": format!("RE-{id}"),
            "status": "DONE",
            "amount_net": amount_net_cents,
            "amount_gross": gross,
            "amount": gross,
            "is_draft": false,
            "due_date": document_date,
            "title": null,
            "items": [{
                "id": id * 10,
                "number": "SRV-1",
                "description": format!("Consulting for invoice {id}\nDetailed breakdown attached"),
                "quantity": 1,
                "unit": "Std.",
                "single_price_net": amount_net_cents,
                "total_price_net": amount_net_cents,
                "vat_percent": 19,
                "position_kind": "POSITION"
            }]
        })));
        invoice
    }

    /// An invoice marked as paid at the given timestamp.
    pub fn paid_invoice(id: i64, customer_id: i64, document_date: &str, paid_at: &str) -> Payload {
        let mut invoice = Self::invoice(id, customer_id, document_date, 10000);
        invoice.insert("paid_at".to_string(), Value::String(paid_at.to_string()));
        invoice
    }

    // =========================================================================
    // Project Fixtures
    // =========================================================================

    /// A project with a money budget.
    pub fn project(id: i64, name: &str, customer_id: Option<i64>) -> Payload {
        object(json!({
            "id": id,
            "name": name,
            "status": "OPEN",
            "customer_id": customer_id,
            "budget_amount": 500000,
            "budget_time": null,
            "consumed_amount": 125000,
            "consumed_time": null
        }))
    }

    /// A minimal PDF body.
    pub fn pdf_bytes() -> Vec<u8> {
        b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\ntrailer\n<<>>\n%%EOF\n".to_vec()
    }

    /// Create a default set of test data for common scenarios.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

/// A complete test scenario with related records.
pub struct DefaultScenario {
    pub customers: Vec<Payload>,
    pub documents: Vec<Payload>,
    pub projects: Vec<Payload>,
    pub pdfs: Vec<(i64, Vec<u8>)>,
}

impl DefaultScenario {
    fn new() -> Self {
        let customers = vec![
            Fixtures::company_customer(1001, "Acme GmbH"),
            Fixtures::person_customer(1002, "Erika", "Mustermann"),
            Fixtures::company_customer(1003, "Globex AG"),
        ];

        let documents = vec![
            Fixtures::invoice(5001, 1001, "2024-11-20", 12345),
            Fixtures::paid_invoice(5002, 1001, "2025-01-15", "2025-02-01T10:15:00+01:00"),
            Fixtures::invoice(5003, 1002, "2025-03-03", 50000),
            Fixtures::document(5004, "OFFER", 1003, "2025-04-01"),
        ];

        let projects = vec![
            Fixtures::project(301, "Website relaunch", Some(1001)),
            Fixtures::project(302, "Internal tooling", None),
        ];

        let pdfs = vec![(5001, Fixtures::pdf_bytes())];

        Self {
            customers,
            documents,
            projects,
            pdfs,
        }
    }
}
