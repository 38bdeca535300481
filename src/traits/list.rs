//! List trait for fetching collections of resources.

use async_trait::async_trait;

use crate::client::EasybillClient;
use crate::error::Result;
use crate::pagination::{self, Page, DEFAULT_PAGE_SIZE};

/// List/filter resources with pagination support.
///
/// Implement this trait for resource types that can be listed with
/// optional filtering and pagination.
///
/// # Example
///
/// ```ignore
/// use easybill_client::{EasybillClient, Customer, List};
///
/// let client = EasybillClient::from_env()?;
///
/// // Fetch a single page
/// let page = Customer::list_page(&client, &Default::default(), 1, 50).await?;
///
/// // Fetch all pages
/// let all_customers = Customer::list_all(&client, &Default::default()).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Query parameters for filtering.
    type Query: Default + Send + Sync;

    /// Plural resource name used in log output.
    const PLURAL: &'static str;

    /// List resources matching the query (single page).
    ///
    /// # Arguments
    ///
    /// * `client` - The Easybill API client
    /// * `query` - Query parameters for filtering
    /// * `page` - Page number (1-indexed)
    /// * `limit` - Number of items per page
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(
        client: &EasybillClient,
        query: &Self::Query,
        page: u32,
        limit: u32,
    ) -> Result<Page<Self>>;

    /// List all resources matching the query (fetches all pages).
    ///
    /// Uses the default page size of 1000.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails; no partial result is
    /// returned in that case.
    async fn list_all(client: &EasybillClient, query: &Self::Query) -> Result<Vec<Self>> {
        Self::list_all_with_limit(client, query, DEFAULT_PAGE_SIZE).await
    }

    /// List all resources matching the query with an explicit page size.
    ///
    /// The same `limit` is sent with every page request.
    async fn list_all_with_limit(
        client: &EasybillClient,
        query: &Self::Query,
        limit: u32,
    ) -> Result<Vec<Self>> {
        tracing::info!("Loading Easybill {}...", Self::PLURAL);

        let all_items =
            pagination::drain(|page| Self::list_page(client, query, page, limit)).await?;

        tracing::info!("Easybill: {} {} loaded", all_items.len(), Self::PLURAL);
        Ok(all_items)
    }
}
