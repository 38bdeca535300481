//! Project model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::EasybillClient;
use crate::error::Result;
use crate::pagination::{ListEnvelope, Page};
use crate::payload::{self, Payload};
use crate::traits::{Get, List};

/// An Easybill project.
///
/// Projects group documents and track budget against consumption, either
/// as money (cents) or as time (minutes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,

    /// Project name (empty when the payload carried none).
    #[serde(default)]
    pub name: String,

    /// Project status, e.g. `"OPEN"` or `"DONE"`.
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub customer_id: Option<i64>,

    /// Budget in cents.
    #[serde(default)]
    pub budget_amount: Option<String>,

    /// Budget in minutes.
    #[serde(default)]
    pub budget_time: Option<i64>,

    /// Consumed budget in cents.
    #[serde(default)]
    pub consumed_amount: Option<String>,

    /// Consumed time in minutes.
    #[serde(default)]
    pub consumed_time: Option<i64>,
}

impl Project {
    /// Map a raw API payload into a project.
    ///
    /// Never fails: missing or malformed fields take their defaults.
    pub fn from_payload(data: &Payload) -> Self {
        Self {
            id: payload::int_or(data, "id", 0),
            name: payload::string_or(data, "name", ""),
            status: payload::string(data, "status"),
            customer_id: payload::int(data, "customer_id"),
            budget_amount: payload::decimal(data, "budget_amount"),
            budget_time: payload::int(data, "budget_time"),
            consumed_amount: payload::decimal(data, "consumed_amount"),
            consumed_time: payload::int(data, "consumed_time"),
        }
    }
}

/// Query parameters for listing projects.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectListQuery {
    /// Only projects of this customer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
}

#[async_trait]
impl Get for Project {
    type Id = i64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &EasybillClient, id: i64) -> Result<Self> {
        let data: Payload = client
            .get_json(&format!("projects/{id}"))
            .await
            .map_err(|e| e.with_not_found_message(format!("Project {id} not found")))?;
        Ok(Self::from_payload(&data))
    }
}

#[async_trait]
impl List for Project {
    type Query = ProjectListQuery;

    const PLURAL: &'static str = "projects";

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &EasybillClient,
        query: &Self::Query,
        page: u32,
        limit: u32,
    ) -> Result<Page<Self>> {
        #[derive(Serialize)]
        struct RequestParams<'a> {
            limit: u32,
            #[serde(flatten)]
            query: &'a ProjectListQuery,
            page: u32,
        }

        let params = RequestParams { limit, query, page };

        let data: ListEnvelope = client.get_json_with_query("projects", &params).await?;
        Ok(data
            .into_page(page, limit)
            .map(|item| Self::from_payload(&item)))
    }
}

/// Fetch all projects, optionally only those of one customer.
pub async fn get_projects(
    client: &EasybillClient,
    customer_id: Option<i64>,
) -> Result<Vec<Project>> {
    Project::list_all(client, &ProjectListQuery { customer_id }).await
}

/// Get a single project by ID.
pub async fn get_project(client: &EasybillClient, id: i64) -> Result<Project> {
    Project::get(client, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn project(value: Value) -> Project {
        match value {
            Value::Object(map) => Project::from_payload(&map),
            _ => panic!("payload must be an object"),
        }
    }

    #[test]
    fn test_project_from_payload() {
        let p = project(json!({
            "id": 31,
            "name": "Website relaunch",
            "status": "OPEN",
            "customer_id": "1001",
            "budget_amount": 500000,
            "budget_time": 6000,
            "consumed_amount": "125000",
            "consumed_time": 1500
        }));

        assert_eq!(p.id, 31);
        assert_eq!(p.name, "Website relaunch");
        assert_eq!(p.customer_id, Some(1001));
        assert_eq!(p.budget_amount.as_deref(), Some("500000"));
        assert_eq!(p.budget_time, Some(6000));
        assert_eq!(p.consumed_amount.as_deref(), Some("125000"));
        assert_eq!(p.consumed_time, Some(1500));
    }

    #[test]
    fn test_project_defaults() {
        let p = project(json!({"budget_amount": null}));
        assert_eq!(p.id, 0);
        assert_eq!(p.name, "");
        assert!(p.status.is_none());
        assert!(p.budget_amount.is_none());
        assert!(p.consumed_time.is_none());
    }

    #[test]
    fn test_list_query_serialization() {
        let serialized = serde_qs::to_string(&ProjectListQuery::default()).unwrap();
        assert!(serialized.is_empty());

        let serialized = serde_qs::to_string(&ProjectListQuery {
            customer_id: Some(9),
        })
        .unwrap();
        assert_eq!(serialized, "customer_id=9");
    }
}
