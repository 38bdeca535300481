//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{Customer, Document, Project};

/// Trait for human-readable key-value output.
///
/// Implemented by resource types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Customer {
    fn pretty_print(&self) -> String {
        let header = format!("Customer #{}", self.id);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("Name:           {}", self.display_name()),
        ];

        if let Some(ref number) = self.number {
            lines.push(format!("Number:         {}", number));
        }

        if let Some(email) = self.primary_email() {
            lines.push(format!("Email:          {}", email));
        }

        let address: Vec<&str> = [&self.street, &self.zip_code, &self.city, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect();
        if !address.is_empty() {
            lines.push(format!("Address:        {}", address.join(", ")));
        }

        if let Some(ref vat) = self.vat_identifier {
            lines.push(format!("VAT ID:         {}", vat));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Document {
    fn pretty_print(&self) -> String {
        let header = format!(
            "{} {}",
            self.document_type,
            self.number.as_deref().unwrap_or("(draft)")
        );
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("ID:             {}", self.id),
            format!("Net:            {} {}", self.amount_net_eur(), self.currency),
            format!("Gross:          {} {}", self.amount_gross_eur(), self.currency),
        ];

        if let Some(date) = self.document_date {
            lines.push(format!("Date:           {}", date.format("%Y-%m-%d")));
        }

        if let Some(due) = self.due_date {
            lines.push(format!("Due:            {}", due.format("%Y-%m-%d")));
        }

        match self.paid_at {
            Some(paid) => lines.push(format!("Paid:           {}", paid.format("%Y-%m-%d"))),
            None => lines.push("Paid:           no".to_string()),
        }

        if let Some(customer_id) = self.customer_id {
            lines.push(format!("Customer:       {}", customer_id));
        }

        if let Some(title) = self.title.clone().or_else(|| self.first_item_description()) {
            lines.push(format!("Title:          {}", title));
        }

        if !self.items.is_empty() {
            lines.push(format!("Items:          {}", self.items.len()));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Project {
    fn pretty_print(&self) -> String {
        let header = format!("Project #{}", self.id);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider, format!("Name:           {}", self.name)];

        if let Some(ref status) = self.status {
            lines.push(format!("Status:         {}", status));
        }

        if let Some(customer_id) = self.customer_id {
            lines.push(format!("Customer:       {}", customer_id));
        }

        if let Some(ref budget) = self.budget_amount {
            lines.push(format!(
                "Budget:         {} (consumed {})",
                budget,
                self.consumed_amount.as_deref().unwrap_or("0")
            ));
        }

        if let Some(budget_time) = self.budget_time {
            lines.push(format!(
                "Time budget:    {} min (consumed {} min)",
                budget_time,
                self.consumed_time.unwrap_or(0)
            ));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_customer_pretty_print_format() {
        let data = json!({
            "id": 7,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "emails_1": "ada@x.test"
        });
        let customer = Customer::from_payload(data.as_object().unwrap());

        let output = customer.pretty_print();
        assert!(output.starts_with("Customer #7"));
        assert!(output.contains("Ada Lovelace"));
        assert!(output.contains("ada@x.test"));
    }

    #[test]
    fn test_document_pretty_print_uses_item_fallback_title() {
        let data = json!({
            "id": 3,
            "type": "OFFER",
            "amount_net": 1000,
            "items": [{"description": "Design work\nmore"}]
        });
        let document = Document::from_payload(data.as_object().unwrap(), true).unwrap();

        let output = document.pretty_print();
        assert!(output.starts_with("OFFER (draft)"));
        assert!(output.contains("Net:            10.00 EUR"));
        assert!(output.contains("Title:          Design work"));
        assert!(output.contains("Paid:           no"));
    }
}
