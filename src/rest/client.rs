//! Havona REST API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::multipart::Form;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_tracing::TracingMiddleware;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::auth::{
    ClientCredentialsGrant, Clock, CredentialStrategy, PasswordGrant, StaticToken, SystemClock,
    TokenCache, identity_http_client,
};
use crate::error::{HavonaError, MAX_ERROR_BODY_CHARS, truncate_chars};
use crate::rest::endpoints::DEFAULT_TIMEOUT;

/// The Havona REST/GraphQL API client.
///
/// Every request attaches a bearer token from the client's own
/// [`TokenCache`] and classifies non-success responses into
/// [`HavonaError`] variants. Requests are never retried.
///
/// # Example
///
/// ```rust,no_run
/// use havona_client::HavonaClient;
/// use havona_client::auth::PasswordGrant;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let grant = PasswordGrant::new(
///         "tenant.us.auth0.com",
///         "https://api.havona.example",
///         "client-id",
///         "trader@example.com",
///         "password",
///     );
///     let client = HavonaClient::from_credentials("https://api.havona.example", grant)?;
///
///     let status = client.blockchain().status().await?;
///     println!("Connected: {}", status.connected);
///
///     Ok(())
/// }
/// ```
///
/// With a pre-obtained token:
///
/// ```rust,no_run
/// use havona_client::HavonaClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = HavonaClient::from_token("https://api.havona.example", "eyJ...")?;
///     let trades = client.trades().list(10, None).await?;
///     println!("{} trades", trades.len());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct HavonaClient {
    http_client: ClientWithMiddleware,
    base_url: String,
    tokens: Arc<TokenCache>,
}

impl HavonaClient {
    /// Create a new client builder.
    pub fn builder() -> HavonaClientBuilder {
        HavonaClientBuilder::new()
    }

    /// Create a client that authenticates with the password grant.
    ///
    /// Tokens are cached and refreshed automatically.
    pub fn from_credentials(
        base_url: impl Into<String>,
        grant: PasswordGrant,
    ) -> Result<Self, HavonaError> {
        Self::builder()
            .base_url(base_url)
            .credentials(CredentialStrategy::Password(grant))
            .build()
    }

    /// Create a client that authenticates with the client credentials grant.
    pub fn from_m2m(
        base_url: impl Into<String>,
        grant: ClientCredentialsGrant,
    ) -> Result<Self, HavonaError> {
        Self::builder()
            .base_url(base_url)
            .credentials(CredentialStrategy::ClientCredentials(grant))
            .build()
    }

    /// Create a client around a pre-obtained bearer token. No refresh logic.
    pub fn from_token(
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, HavonaError> {
        Self::builder()
            .base_url(base_url)
            .credentials(CredentialStrategy::Static(StaticToken::new(token)))
            .build()
    }

    /// Create a client from environment variables.
    ///
    /// Reads the base URL from `HAVONA_API_URL` and credentials as described
    /// in [`CredentialStrategy::from_env`].
    pub fn from_env() -> Result<Self, HavonaError> {
        let base_url = std::env::var("HAVONA_API_URL")
            .map_err(|_| HavonaError::Config("HAVONA_API_URL is not set".to_string()))?;
        let credentials = CredentialStrategy::from_env().ok_or(HavonaError::MissingCredentials)?;
        Self::builder()
            .base_url(base_url)
            .credentials(credentials)
            .build()
    }

    /// The platform base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The token cache backing this client.
    pub fn token_cache(&self) -> &TokenCache {
        &self.tokens
    }

    /// Make an authenticated GET request.
    pub(crate) async fn get<T>(&self, endpoint: &str) -> Result<T, HavonaError>
    where
        T: DeserializeOwned,
    {
        let request = self.http_client.get(self.url(endpoint));
        let response = self.execute(request).await?;
        Self::parse_response(response).await
    }

    /// Make an authenticated request with a JSON body.
    pub(crate) async fn send_json<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<T, HavonaError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(body)?;
        let request = self
            .http_client
            .request(method, self.url(endpoint))
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        let response = self.execute(request).await?;
        Self::parse_response(response).await
    }

    /// Make an authenticated multipart POST request.
    ///
    /// `Content-Type` is left to reqwest so the multipart boundary is set.
    pub(crate) async fn post_multipart<T>(
        &self,
        endpoint: &str,
        form: Form,
    ) -> Result<T, HavonaError>
    where
        T: DeserializeOwned,
    {
        let request = self.http_client.post(self.url(endpoint)).multipart(form);
        let response = self.execute(request).await?;
        Self::parse_response(response).await
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Attach the bearer token, send, and classify the status.
    async fn execute(&self, request: RequestBuilder) -> Result<reqwest::Response, HavonaError> {
        let token = self.tokens.get_token().await?;
        let response = request
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = error_body(status, response.text().await);
        Err(HavonaError::from_status(status, &body))
    }

    /// Parse a successful response body as JSON.
    async fn parse_response<T>(response: reqwest::Response) -> Result<T, HavonaError>
    where
        T: DeserializeOwned,
    {
        let body = response.text().await?;
        let text = if body.trim().is_empty() { "null" } else { &body };

        serde_json::from_str(text).map_err(|e| {
            HavonaError::InvalidResponse(format!(
                "Failed to parse response: {}. Body: {}",
                e,
                truncate_chars(&body, MAX_ERROR_BODY_CHARS)
            ))
        })
    }
}

/// Body text for a failed response; a body that cannot be read is described
/// in place of its contents so the status is still reported.
fn error_body(status: StatusCode, body: Result<String, reqwest::Error>) -> String {
    body.unwrap_or_else(|e| {
        tracing::debug!(%status, error = %e, "Failed to read error response body");
        format!("<failed to read response body: {e}>")
    })
}

impl std::fmt::Debug for HavonaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HavonaClient")
            .field("base_url", &self.base_url)
            .field("grant", &self.tokens.strategy().kind())
            .finish()
    }
}

/// Builder for [`HavonaClient`].
pub struct HavonaClientBuilder {
    base_url: Option<String>,
    credentials: Option<Arc<CredentialStrategy>>,
    timeout: Duration,
    user_agent: Option<String>,
    clock: Option<Arc<dyn Clock>>,
}

impl HavonaClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            clock: None,
        }
    }

    /// Set the platform base URL (e.g. `https://api.havona.example`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the credential strategy used to obtain bearer tokens.
    pub fn credentials(mut self, credentials: impl Into<CredentialStrategy>) -> Self {
        self.credentials = Some(Arc::new(credentials.into()));
        self
    }

    /// Share an existing credential strategy.
    ///
    /// The built client still gets its own token cache.
    pub fn shared_credentials(mut self, credentials: Arc<CredentialStrategy>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the per-request timeout for platform calls (default 30 s).
    ///
    /// Identity endpoint requests always use their own fixed 10 s timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the clock used for token expiry.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HavonaClient, HavonaError> {
        let base_url = self
            .base_url
            .ok_or_else(|| HavonaError::Config("base URL is required".to_string()))?;
        let parsed = url::Url::parse(&base_url)?;
        if parsed.cannot_be_a_base() {
            return Err(HavonaError::Config(format!(
                "base URL cannot be used as a base: {base_url}"
            )));
        }
        let base_url = base_url.trim_end_matches('/').to_string();

        let credentials = self.credentials.ok_or(HavonaError::MissingCredentials)?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("havona-client/{}", env!("CARGO_PKG_VERSION")));

        let mut headers = HeaderMap::new();
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("havona-client"));
        headers.insert(USER_AGENT, header_value);

        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()?;

        let http_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let identity_http = identity_http_client(&user_agent)?;
        let tokens = TokenCache::with_parts(credentials, identity_http, clock);

        Ok(HavonaClient {
            http_client,
            base_url,
            tokens: Arc::new(tokens),
        })
    }
}

impl Default for HavonaClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
