//! Customer model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::EasybillClient;
use crate::error::Result;
use crate::pagination::{ListEnvelope, Page};
use crate::payload::{self, Payload};
use crate::traits::{Get, List};

/// Number of indexed `emails_N` fields a customer payload can carry.
const EMAIL_SLOTS: usize = 3;

/// An Easybill customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer ID (0 when the payload carried none).
    pub id: i64,

    /// Customer number.
    #[serde(default)]
    pub number: Option<String>,

    /// Company name.
    #[serde(default)]
    pub company_name: Option<String>,

    /// First name of the contact person.
    #[serde(default)]
    pub first_name: Option<String>,

    /// Last name of the contact person.
    #[serde(default)]
    pub last_name: Option<String>,

    /// Email addresses in the order they appear on the customer.
    #[serde(default)]
    pub emails: Vec<String>,

    #[serde(default)]
    pub street: Option<String>,

    #[serde(default)]
    pub zip_code: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    /// ISO country code.
    #[serde(default)]
    pub country: Option<String>,

    /// VAT identification number.
    #[serde(default)]
    pub vat_identifier: Option<String>,

    /// Payment option code.
    #[serde(default)]
    pub payment_options: Option<i64>,
}

impl Customer {
    /// Map a raw API payload into a customer.
    ///
    /// Never fails: missing or malformed fields take their defaults.
    pub fn from_payload(data: &Payload) -> Self {
        let emails = (1..=EMAIL_SLOTS)
            .filter_map(|slot| payload::string(data, &format!("emails_{slot}")))
            .filter(|email| !email.is_empty())
            .collect();

        Self {
            id: payload::int_or(data, "id", 0),
            number: payload::string(data, "number"),
            company_name: payload::string(data, "company_name"),
            first_name: payload::string(data, "first_name"),
            last_name: payload::string(data, "last_name"),
            emails,
            street: payload::string(data, "street"),
            zip_code: payload::string(data, "zip_code"),
            city: payload::string(data, "city"),
            country: payload::string(data, "country"),
            vat_identifier: payload::string(data, "vat_identifier"),
            payment_options: payload::int(data, "payment_options"),
        }
    }

    /// Name to show for this customer.
    ///
    /// Prefers the company name, then the contact's full name (only when
    /// both first and last name are set), then the customer number, and
    /// finally `"Customer {id}"`.
    pub fn display_name(&self) -> String {
        if let Some(company) = non_empty(&self.company_name) {
            return company.to_string();
        }

        if let (Some(first), Some(last)) =
            (non_empty(&self.first_name), non_empty(&self.last_name))
        {
            let full_name = format!("{first} {last}");
            let full_name = full_name.trim();
            if !full_name.is_empty() {
                return full_name.to_string();
            }
        }

        match non_empty(&self.number) {
            Some(number) => number.to_string(),
            None => format!("Customer {}", self.id),
        }
    }

    /// The first email address, if any.
    pub fn primary_email(&self) -> Option<&str> {
        self.emails.first().map(String::as_str)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Query parameters for listing customers.
///
/// The customers endpoint takes no filters besides paging.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomerListQuery {}

#[async_trait]
impl Get for Customer {
    type Id = i64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &EasybillClient, id: i64) -> Result<Self> {
        let data: Payload = client
            .get_json(&format!("customers/{id}"))
            .await
            .map_err(|e| e.with_not_found_message(format!("Customer {id} not found")))?;
        Ok(Self::from_payload(&data))
    }
}

#[async_trait]
impl List for Customer {
    type Query = CustomerListQuery;

    const PLURAL: &'static str = "customers";

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &EasybillClient,
        _query: &Self::Query,
        page: u32,
        limit: u32,
    ) -> Result<Page<Self>> {
        let params = [("limit", limit), ("page", page)];
        let data: ListEnvelope = client.get_json_with_query("customers", &params).await?;
        Ok(data
            .into_page(page, limit)
            .map(|item| Self::from_payload(&item)))
    }
}

/// Fetch all customers.
///
/// # Example
///
/// ```ignore
/// use easybill_client::{EasybillClient, get_customers};
///
/// let client = EasybillClient::from_env()?;
/// for customer in get_customers(&client).await? {
///     println!("{}", customer.display_name());
/// }
/// ```
pub async fn get_customers(client: &EasybillClient) -> Result<Vec<Customer>> {
    Customer::list_all(client, &CustomerListQuery::default()).await
}

/// Get a single customer by ID.
pub async fn get_customer(client: &EasybillClient, id: i64) -> Result<Customer> {
    Customer::get(client, id).await
}
