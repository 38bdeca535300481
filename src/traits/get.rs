//! Get trait for fetching single resources.

use async_trait::async_trait;

use crate::client::EasybillClient;
use crate::error::Result;

/// Fetch a single resource by ID.
///
/// A missing resource fails with [`EasybillError::NotFound`] carrying a
/// message that names the resource, e.g. `"Customer 42 not found"`.
///
/// # Example
///
/// ```ignore
/// use easybill_client::{EasybillClient, Customer, Get};
///
/// let client = EasybillClient::from_env()?;
/// let customer = Customer::get(&client, 42).await?;
/// ```
///
/// [`EasybillError::NotFound`]: crate::EasybillError::NotFound
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this resource.
    type Id;

    /// Fetch the resource by ID.
    ///
    /// # Arguments
    ///
    /// * `client` - The Easybill API client
    /// * `id` - The resource identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is not found, the request fails or
    /// the payload cannot be mapped.
    async fn get(client: &EasybillClient, id: Self::Id) -> Result<Self>;
}
