//! Easybill API client.
//!
//! Low-level HTTP client that handles authentication, raw requests and
//! error classification. Resource operations are implemented via traits on
//! the model types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::{EasybillError, Result};

const DEFAULT_API_URL: &str = "https://api.easybill.de/rest/v1/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("easybill-client/", env!("CARGO_PKG_VERSION"));

const REQUEST_FAILED: &str = "API request failed";

/// Low-level Easybill API client.
///
/// Handles authentication and HTTP requests. Resource-specific operations
/// are implemented via the `Get` and `List` traits on model types.
///
/// Every call issues its requests one after another and returns once the
/// complete result is available; nothing is cached between calls.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use easybill_client::EasybillClient;
///
/// # fn example() -> easybill_client::Result<()> {
/// // Create from environment variables
/// let client = EasybillClient::from_env()?;
///
/// // Or configure manually
/// let client = EasybillClient::new("your-api-key", "https://api.easybill.de/rest/v1")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EasybillClient {
    http: Client,
    base_url: Arc<Url>,
    api_key: String,
}

impl std::fmt::Debug for EasybillClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EasybillClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl EasybillClient {
    /// Create a client from environment variables.
    ///
    /// Uses `EASYBILL_API_KEY` for authentication, and optionally
    /// `EASYBILL_API_URL` for the base URL and `EASYBILL_TIMEOUT_SECS` for
    /// the request timeout (30 seconds by default).
    ///
    /// # Errors
    ///
    /// Returns an error if `EASYBILL_API_KEY` is not set or
    /// `EASYBILL_TIMEOUT_SECS` is not a number.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("EASYBILL_API_KEY").map_err(|_| {
            EasybillError::ConfigMissing(
                "EASYBILL_API_KEY environment variable not set".to_string(),
            )
        })?;

        let base_url =
            env::var("EASYBILL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout_secs = match env::var("EASYBILL_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                EasybillError::ConfigMissing(format!(
                    "EASYBILL_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                ))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Self::with_timeout(&api_key, &base_url, Duration::from_secs(timeout_secs))
    }

    /// Create a new client with the provided API key and base URL.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Easybill API key, sent as a bearer token
    /// * `base_url` - Base URL for the API (e.g., `https://api.easybill.de/rest/v1`)
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(api_key: &str, base_url: &str) -> Result<Self> {
        Self::with_timeout(api_key, base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new client with an explicit request timeout.
    ///
    /// A request exceeding the timeout fails with an `Api` error.
    pub fn with_timeout(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(timeout)
            .build()
            .map_err(|e| EasybillError::transport("Failed to build HTTP client", e))?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            api_key: api_key.to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Response> {
        self.send(path, None::<&()>, REQUEST_FAILED).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        self.send(path, Some(query), REQUEST_FAILED).await
    }

    /// GET a JSON object.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.get(path).await?;
        Self::decode(response).await
    }

    /// GET a JSON object with query parameters.
    pub(crate) async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.get_with_query(path, query).await?;
        Self::decode(response).await
    }

    /// GET a binary body without decoding it.
    ///
    /// `transport_prefix` labels the message of transport failures.
    #[tracing::instrument(skip(self))]
    pub(crate) async fn get_bytes(&self, path: &str, transport_prefix: &str) -> Result<Vec<u8>> {
        let response = self.send(path, None::<&()>, transport_prefix).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| EasybillError::transport(transport_prefix, e))?;
        Ok(bytes.to_vec())
    }

    async fn send<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: Option<&Q>,
        transport_prefix: &str,
    ) -> Result<Response> {
        let url = self.base_url.join(path)?;

        let mut request = self.http.get(url).bearer_auth(&self.api_key);
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EasybillError::transport(transport_prefix, e))?;

        Self::check_response(response).await
    }

    /// Check response status and classify failures.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let transport_message = response
            .error_for_status_ref()
            .err()
            .map(|e| e.to_string())
            .unwrap_or_else(|| format!("HTTP {status}"));

        // A body that is not JSON still classifies by status alone
        let body = match response.bytes().await {
            Ok(bytes) => serde_json::from_slice::<Value>(&bytes).ok(),
            Err(_) => None,
        };

        tracing::debug!(status = status.as_u16(), "Easybill API returned an error");
        Err(EasybillError::classify(
            status.as_u16(),
            body,
            transport_message,
        ))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| EasybillError::transport(REQUEST_FAILED, e))?;
        serde_json::from_slice(&bytes).map_err(EasybillError::decode)
    }
}
