//! Document model and trait implementations.
//!
//! Documents cover invoices, credit notes, offers, orders and recurring
//! invoices. Amounts are kept exactly as the API sends them, in minor
//! currency units (cents), and only converted on demand.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::client::EasybillClient;
use crate::error::Result;
use crate::pagination::{ListEnvelope, Page};
use crate::payload::{self, Payload};
use crate::traits::{Get, List};

/// Longest first-item description returned by
/// [`Document::first_item_description`], in characters.
const DESCRIPTION_MAX_CHARS: usize = 100;

/// Kind of an Easybill document.
///
/// Types the API adds in the future are kept verbatim in [`Other`](Self::Other).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum DocumentType {
    #[default]
    Invoice,
    Credit,
    Offer,
    Order,
    Recurring,
    Other(String),
}

impl DocumentType {
    /// The wire representation, e.g. `"INVOICE"`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Invoice => "INVOICE",
            Self::Credit => "CREDIT",
            Self::Offer => "OFFER",
            Self::Order => "ORDER",
            Self::Recurring => "RECURRING",
            Self::Other(raw) => raw,
        }
    }

    /// Whether this is one of the types known to this crate.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl FromStr for DocumentType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "INVOICE" => Self::Invoice,
            "CREDIT" => Self::Credit,
            "OFFER" => Self::Offer,
            "ORDER" => Self::Order,
            "RECURRING" => Self::Recurring,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DocumentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DocumentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}

/// A single line item of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentItem {
    #[serde(default)]
    pub id: Option<i64>,

    /// Article number.
    #[serde(default)]
    pub number: Option<String>,

    /// Free text, possibly spanning several lines.
    #[serde(default)]
    pub description: Option<String>,

    /// Quantity as an exact decimal.
    pub quantity: String,

    #[serde(default)]
    pub unit: Option<String>,

    /// Net unit price in cents.
    pub single_price_net: String,

    /// Net line total in cents.
    pub total_price_net: String,

    /// VAT rate in percent.
    pub vat_percent: String,

    /// Position kind, e.g. `"POSITION"` or `"TEXT"`.
    #[serde(default)]
    pub position_kind: Option<String>,
}

impl DocumentItem {
    /// Map a raw API payload into a line item.
    ///
    /// Never fails: missing or malformed fields take their defaults.
    pub fn from_payload(data: &Payload) -> Self {
        Self {
            id: payload::int(data, "id"),
            number: payload::string(data, "number"),
            description: payload::string(data, "description"),
            quantity: payload::decimal_or(data, "quantity", "1"),
            unit: payload::string(data, "unit"),
            single_price_net: payload::decimal_or(data, "single_price_net", "0"),
            total_price_net: payload::decimal_or(data, "total_price_net", "0"),
            vat_percent: payload::decimal_or(data, "vat_percent", "19"),
            position_kind: payload::string(data, "position_kind"),
        }
    }
}

/// An Easybill document (invoice, credit note, offer, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,

    #[serde(rename = "type")]
    pub document_type: DocumentType,

    /// Document number, assigned once the document is finalized.
    #[serde(default)]
    pub number: Option<String>,

    #[serde(default)]
    pub document_date: Option<NaiveDate>,

    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    /// Date the document was paid (time of day is dropped).
    #[serde(default)]
    pub paid_at: Option<NaiveDate>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub customer_id: Option<i64>,

    #[serde(default)]
    pub project_id: Option<i64>,

    /// Net amount in cents.
    pub amount_net: String,

    /// Gross amount in cents.
    pub amount_gross: String,

    /// Legacy gross amount in cents, used when `amount_gross` is `"0"`.
    pub amount: String,

    pub currency: String,

    #[serde(default)]
    pub is_draft: bool,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub text_prefix: Option<String>,

    /// Line items; empty unless they were requested.
    #[serde(default)]
    pub items: Vec<DocumentItem>,
}

impl Document {
    /// Map a raw API payload into a document.
    ///
    /// Line items are mapped only when `with_items` is true.
    ///
    /// # Errors
    ///
    /// Returns [`EasybillError::Mapping`](crate::EasybillError::Mapping) if
    /// `document_date`, `due_date` or `paid_at` holds something other than
    /// a date.
    pub fn from_payload(data: &Payload, with_items: bool) -> Result<Self> {
        let items = match data.get("items") {
            Some(Value::Array(raw_items)) if with_items => raw_items
                .iter()
                .filter_map(Value::as_object)
                .map(DocumentItem::from_payload)
                .collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            id: payload::int_or(data, "id", 0),
            document_type: payload::string(data, "type")
                .map(|raw| raw.parse().unwrap_or_default())
                .unwrap_or_default(),
            number: payload::string(data, "number"),
            document_date: payload::date(data, "document_date")?,
            due_date: payload::date(data, "due_date")?,
            paid_at: payload::date(data, "paid_at")?,
            status: payload::string(data, "status"),
            customer_id: payload::int(data, "customer_id"),
            project_id: payload::int(data, "project_id"),
            amount_net: payload::decimal_or(data, "amount_net", "0"),
            amount_gross: payload::decimal_or(data, "amount_gross", "0"),
            amount: payload::decimal_or(data, "amount", "0"),
            currency: payload::string_or(data, "currency", "EUR"),
            is_draft: payload::boolean(data, "is_draft"),
            title: payload::string(data, "title"),
            text: payload::string(data, "text"),
            text_prefix: payload::string(data, "text_prefix"),
            items,
        })
    }

    /// Net amount in major currency units with two decimals, e.g. `"123.45"`.
    pub fn amount_net_eur(&self) -> String {
        cents_to_major(&self.amount_net)
    }

    /// Gross amount in major currency units with two decimals.
    ///
    /// Falls back to the legacy `amount` field when `amount_gross` is `"0"`.
    pub fn amount_gross_eur(&self) -> String {
        let gross = if self.amount_gross != "0" {
            &self.amount_gross
        } else {
            &self.amount
        };
        cents_to_major(gross)
    }

    /// Whether the document has been paid.
    pub fn is_paid(&self) -> bool {
        self.paid_at.is_some()
    }

    /// First line of the first item's description, trimmed and cut to 100
    /// characters.
    pub fn first_item_description(&self) -> Option<String> {
        let description = self.items.first()?.description.as_deref()?;
        let first_line = description.split('\n').next().unwrap_or_default().trim();
        Some(first_line.chars().take(DESCRIPTION_MAX_CHARS).collect())
    }
}

/// Divide a cent amount by 100, truncating to exactly two decimals.
fn cents_to_major(cents: &str) -> String {
    let cents = payload::parse_decimal(cents).unwrap_or(Decimal::ZERO);
    let mut major = (cents / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::ToZero);
    major.rescale(2);
    major.to_string()
}

/// Filters for listing documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentListQuery {
    /// Only documents of this type.
    pub document_type: Option<DocumentType>,

    /// Earliest document date. Required for any date filtering.
    pub start_date: Option<NaiveDate>,

    /// Latest document date; ignored without `start_date`.
    pub end_date: Option<NaiveDate>,

    /// Only documents of this customer.
    pub customer_id: Option<i64>,

    /// Only documents with this status.
    pub status: Option<String>,

    /// Keep line items on the listed documents.
    pub with_items: bool,
}

impl DocumentListQuery {
    /// Wire parameters for a single page request.
    pub fn to_params(&self, page: u32, limit: u32) -> DocumentListParams<'_> {
        DocumentListParams {
            limit,
            document_type: self.document_type.as_ref().map(DocumentType::as_str),
            document_date: self.document_date_filter(),
            customer_id: self.customer_id,
            status: self.status.as_deref(),
            page,
        }
    }

    /// `START,END` when both bounds are set, `START` when only the start is.
    fn document_date_filter(&self) -> Option<String> {
        let start = self.start_date?.format("%Y-%m-%d");
        Some(match self.end_date {
            Some(end) => format!("{start},{}", end.format("%Y-%m-%d")),
            None => start.to_string(),
        })
    }
}

/// Query string for `GET documents`.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentListParams<'a> {
    pub limit: u32,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub document_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'a str>,
    pub page: u32,
}

/// Filters for [`get_invoices`].
#[derive(Debug, Clone, Default)]
pub struct InvoiceQuery {
    /// Whole calendar year; used only when `start_date` is not set.
    pub year: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub customer_id: Option<i64>,
}

impl InvoiceQuery {
    fn into_document_query(self) -> DocumentListQuery {
        let (start_date, end_date) = match (self.year, self.start_date) {
            (Some(year), None) => (
                NaiveDate::from_ymd_opt(year, 1, 1),
                NaiveDate::from_ymd_opt(year, 12, 31),
            ),
            _ => (self.start_date, self.end_date),
        };

        DocumentListQuery {
            document_type: Some(DocumentType::Invoice),
            start_date,
            end_date,
            customer_id: self.customer_id,
            ..Default::default()
        }
    }
}

impl Document {
    /// Fetch a single document, optionally with its line items.
    #[tracing::instrument(skip(client))]
    pub async fn get_with_items(
        client: &EasybillClient,
        id: i64,
        with_items: bool,
    ) -> Result<Self> {
        let data: Payload = client
            .get_json(&format!("documents/{id}"))
            .await
            .map_err(|e| e.with_not_found_message(format!("Document {id} not found")))?;
        Self::from_payload(&data, with_items)
    }
}

#[async_trait]
impl Get for Document {
    type Id = i64;

    /// Fetch a single document including its line items.
    async fn get(client: &EasybillClient, id: i64) -> Result<Self> {
        Self::get_with_items(client, id, true).await
    }
}

#[async_trait]
impl List for Document {
    type Query = DocumentListQuery;

    const PLURAL: &'static str = "documents";

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &EasybillClient,
        query: &Self::Query,
        page: u32,
        limit: u32,
    ) -> Result<Page<Self>> {
        let params = query.to_params(page, limit);
        let data: ListEnvelope = client.get_json_with_query("documents", &params).await?;
        data.into_page(page, limit)
            .try_map(|item| Self::from_payload(&item, query.with_items))
    }
}

// Convenience functions for working with documents

/// Fetch all documents matching the filters.
///
/// # Example
///
/// ```ignore
/// use easybill_client::{EasybillClient, get_documents, DocumentListQuery, DocumentType};
///
/// let client = EasybillClient::from_env()?;
/// let offers = get_documents(
///     &client,
///     DocumentListQuery {
///         document_type: Some(DocumentType::Offer),
///         ..Default::default()
///     },
/// ).await?;
/// ```
pub async fn get_documents(
    client: &EasybillClient,
    query: DocumentListQuery,
) -> Result<Vec<Document>> {
    Document::list_all(client, &query).await
}

/// Fetch all invoices, optionally restricted to a year, a date range or a
/// customer.
///
/// A `year` without `start_date` covers January 1st to December 31st.
pub async fn get_invoices(client: &EasybillClient, query: InvoiceQuery) -> Result<Vec<Document>> {
    Document::list_all(client, &query.into_document_query()).await
}

/// Get a single document by ID, including its line items.
pub async fn get_document(client: &EasybillClient, id: i64) -> Result<Document> {
    Document::get(client, id).await
}

/// Download the PDF rendering of a document.
///
/// The bytes are returned as-is. A missing document fails with
/// `NotFound` ("Document {id} not found").
#[tracing::instrument(skip(client))]
pub async fn get_document_pdf(client: &EasybillClient, id: i64) -> Result<Vec<u8>> {
    client
        .get_bytes(&format!("documents/{id}/pdf"), "Error loading PDF")
        .await
        .map_err(|e| e.with_not_found_message(format!("Document {id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EasybillError;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => panic!("payload must be an object"),
        }
    }

    fn document(value: Value) -> Document {
        Document::from_payload(&payload(value), true).expect("Failed to map document")
    }

    fn with_first_description(description: &str) -> Document {
        document(json!({
            "id": 1,
            "items": [{"description": description}, {"description": "second"}]
        }))
    }

    #[test]
    fn test_document_from_full_payload() {
        let doc = document(json!({
            "id": 501,
            "type": "INVOICE",
            "number": "RE-2024-0001",
            "document_date": "2024-02-01",
            "due_date": "2024-02-15",
            "paid_at": "2024-02-10T09:30:00+01:00",
            "status": "DONE",
            "customer_id": 1001,
            "project_id": "77",
            "amount_net": 12345,
            "amount_gross": "14691",
            "amount": 14691,
            "currency": "CHF",
            "is_draft": false,
            "title": "Consulting",
            "text": "Thanks",
            "text_prefix": "Dear customer",
            "items": [{
                "id": 9,
                "number": "A-1",
                "description": "Workshop",
                "quantity": 2,
                "unit": "h",
                "single_price_net": 6172.5,
                "total_price_net": 12345,
                "vat_percent": 19,
                "position_kind": "POSITION"
            }]
        }));

        assert_eq!(doc.id, 501);
        assert_eq!(doc.document_type, DocumentType::Invoice);
        assert_eq!(doc.document_date, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(doc.due_date, NaiveDate::from_ymd_opt(2024, 2, 15));
        assert_eq!(doc.paid_at, NaiveDate::from_ymd_opt(2024, 2, 10));
        assert_eq!(doc.customer_id, Some(1001));
        assert_eq!(doc.project_id, Some(77));
        assert_eq!(doc.amount_net, "12345");
        assert_eq!(doc.amount_gross, "14691");
        assert_eq!(doc.currency, "CHF");
        assert!(doc.is_paid());
        assert_eq!(doc.items.len(), 1);

        let item = &doc.items[0];
        assert_eq!(item.id, Some(9));
        assert_eq!(item.quantity, "2");
        assert_eq!(item.single_price_net, "6172.5");
        assert_eq!(item.vat_percent, "19");
        assert_eq!(item.position_kind.as_deref(), Some("POSITION"));
    }

    #[test]
    fn test_document_defaults() {
        let doc = document(json!({}));
        assert_eq!(doc.id, 0);
        assert_eq!(doc.document_type, DocumentType::Invoice);
        assert_eq!(doc.amount_net, "0");
        assert_eq!(doc.amount_gross, "0");
        assert_eq!(doc.amount, "0");
        assert_eq!(doc.currency, "EUR");
        assert!(!doc.is_draft);
        assert!(!doc.is_paid());
        assert!(doc.items.is_empty());
        assert!(doc.first_item_description().is_none());
    }

    #[test]
    fn test_item_defaults() {
        let item = DocumentItem::from_payload(&payload(json!({"description": "x"})));
        assert_eq!(item.id, None);
        assert_eq!(item.quantity, "1");
        assert_eq!(item.single_price_net, "0");
        assert_eq!(item.total_price_net, "0");
        assert_eq!(item.vat_percent, "19");
    }

    #[test]
    fn test_items_skipped_unless_requested() {
        let data = payload(json!({"id": 3, "items": [{"description": "x"}]}));
        let doc = Document::from_payload(&data, false).unwrap();
        assert!(doc.items.is_empty());
    }

    #[test]
    fn test_unknown_type_passes_through() {
        let doc = document(json!({"type": "DELIVERY"}));
        assert_eq!(doc.document_type, DocumentType::Other("DELIVERY".to_string()));
        assert_eq!(doc.document_type.as_str(), "DELIVERY");
        assert!(!doc.document_type.is_known());
    }

    #[test]
    fn test_malformed_date_is_mapping_error() {
        let result = Document::from_payload(&payload(json!({"due_date": "soon"})), true);
        match result {
            Err(EasybillError::Mapping { field, .. }) => assert_eq!(field, "due_date"),
            other => panic!("Expected mapping error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_dates_are_absent() {
        let doc = document(json!({"document_date": "", "paid_at": ""}));
        assert!(doc.document_date.is_none());
        assert!(!doc.is_paid());
    }

    #[test]
    fn test_amount_net_eur() {
        let doc = document(json!({"amount_net": "12345"}));
        assert_eq!(doc.amount_net_eur(), "123.45");

        let doc = document(json!({"amount_net": 7}));
        assert_eq!(doc.amount_net_eur(), "0.07");

        let doc = document(json!({"amount_net": "-250"}));
        assert_eq!(doc.amount_net_eur(), "-2.50");
    }

    #[test]
    fn test_amount_gross_falls_back_to_legacy_amount() {
        let doc = document(json!({"amount_gross": "0", "amount": "5000"}));
        assert_eq!(doc.amount_gross_eur(), "50.00");

        let doc = document(json!({"amount_gross": "11900", "amount": "5000"}));
        assert_eq!(doc.amount_gross_eur(), "119.00");
    }

    #[test]
    fn test_amount_conversion_truncates() {
        let doc = document(json!({"amount_net": "100.999"}));
        assert_eq!(doc.amount_net_eur(), "1.00");

        let doc = document(json!({"amount_net": "199.9"}));
        assert_eq!(doc.amount_net_eur(), "1.99");
    }

    #[test]
    fn test_large_amounts_stay_exact() {
        let doc = document(json!({"amount_net": "123456789012345678901"}));
        assert_eq!(doc.amount_net_eur(), "1234567890123456789.01");
    }

    #[test]
    fn test_first_item_description_first_line() {
        let doc = with_first_description("Line one\nLine two");
        assert_eq!(doc.first_item_description().as_deref(), Some("Line one"));

        let doc = with_first_description("  padded \r\nrest");
        assert_eq!(doc.first_item_description().as_deref(), Some("padded"));
    }

    #[test]
    fn test_first_item_description_truncated() {
        let doc = with_first_description(&"x".repeat(150));
        assert_eq!(doc.first_item_description(), Some("x".repeat(100)));

        let doc = with_first_description(&"ä".repeat(120));
        assert_eq!(doc.first_item_description().unwrap().chars().count(), 100);
    }

    #[test]
    fn test_first_item_without_description() {
        let doc = document(json!({"items": [{"number": "A-1"}]}));
        assert!(doc.first_item_description().is_none());
    }

    #[test]
    fn test_date_range_params() {
        let query = DocumentListQuery {
            document_type: Some(DocumentType::Invoice),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 31),
            customer_id: Some(42),
            status: Some("DONE".to_string()),
            with_items: false,
        };
        let serialized = serde_qs::to_string(&query.to_params(2, 500)).unwrap();

        assert!(serialized.contains("limit=500"));
        assert!(serialized.contains("page=2"));
        assert!(serialized.contains("type=INVOICE"));
        assert!(
            serialized.contains("document_date=2025-01-01%2C2025-12-31")
                || serialized.contains("document_date=2025-01-01,2025-12-31"),
            "unexpected date range encoding: {serialized}"
        );
        assert!(serialized.contains("customer_id=42"));
        assert!(serialized.contains("status=DONE"));
    }

    #[test]
    fn test_start_only_and_end_only_dates() {
        let query = DocumentListQuery {
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            ..Default::default()
        };
        assert_eq!(
            query.to_params(1, 10).document_date.as_deref(),
            Some("2025-03-01")
        );

        let query = DocumentListQuery {
            end_date: NaiveDate::from_ymd_opt(2025, 3, 31),
            ..Default::default()
        };
        assert!(query.to_params(1, 10).document_date.is_none());
    }

    #[test]
    fn test_default_params_only_paging() {
        let serialized =
            serde_qs::to_string(&DocumentListQuery::default().to_params(1, 1000)).unwrap();
        assert_eq!(serialized, "limit=1000&page=1");
    }

    #[test]
    fn test_invoice_query_year_expands() {
        let query = InvoiceQuery {
            year: Some(2025),
            customer_id: Some(3),
            ..Default::default()
        }
        .into_document_query();

        assert_eq!(query.document_type, Some(DocumentType::Invoice));
        assert_eq!(query.start_date, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(query.end_date, NaiveDate::from_ymd_opt(2025, 12, 31));
        assert_eq!(query.customer_id, Some(3));
    }

    #[test]
    fn test_invoice_query_explicit_start_wins_over_year() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1);
        let query = InvoiceQuery {
            year: Some(2025),
            start_date: start,
            ..Default::default()
        }
        .into_document_query();

        assert_eq!(query.start_date, start);
        assert_eq!(query.end_date, None);
    }

    #[test]
    fn test_serialized_fields_match_payload() {
        let payload = json!({
            "id": 12,
            "type": "CREDIT",
            "number": "GS-1",
            "document_date": "2024-05-02",
            "amount_net": "1000",
            "amount_gross": "1190",
            "amount": "1190",
            "currency": "EUR",
            "is_draft": true,
            "customer_id": 4
        });
        let value = serde_json::to_value(document(payload.clone())).unwrap();

        for key in [
            "id",
            "type",
            "number",
            "document_date",
            "amount_net",
            "amount_gross",
            "amount",
            "currency",
            "is_draft",
            "customer_id",
        ] {
            assert_eq!(value[key], payload[key], "field {key}");
        }
    }
}
