//! Credential strategies for obtaining Havona bearer tokens.
//!
//! Three grant shapes are supported, modelled as a closed enum:
//!
//! - [`PasswordGrant`]: username + password, for interactive users
//! - [`ClientCredentialsGrant`]: client id + secret, for service accounts
//! - [`StaticToken`]: a pre-obtained token injected as-is

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::error::{ApiError, HavonaError, truncate_chars};

/// Fixed timeout applied to every identity endpoint request.
pub const IDENTITY_TIMEOUT: Duration = Duration::from_secs(10);

/// Scope requested by the password grant.
pub const PASSWORD_GRANT_SCOPE: &str = "openid profile email";

/// Maximum number of body characters kept on identity endpoint errors.
const MAX_IDENTITY_BODY_CHARS: usize = 300;

/// How long an issued token stays valid, as reported by its issuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLifetime {
    /// The issuer returned `expires_in` (seconds).
    Seconds(u64),
    /// The issuer did not say; the cache applies its default TTL.
    Unspecified,
    /// The token never expires and is never refreshed.
    Unbounded,
}

/// A freshly issued bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// The bearer token string.
    pub access_token: String,
    /// Lifetime reported by the issuer.
    pub lifetime: TokenLifetime,
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("access_token", &"[REDACTED]")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

/// Resource Owner Password grant credentials.
#[derive(Clone)]
pub struct PasswordGrant {
    domain: String,
    audience: String,
    client_id: String,
    username: String,
    password: SecretString,
    token_url: String,
}

impl PasswordGrant {
    /// Create password grant credentials.
    ///
    /// `domain` is the identity tenant host (e.g. `tenant.us.auth0.com`). A value
    /// that already carries a scheme is used as the issuer base verbatim.
    pub fn new(
        domain: impl Into<String>,
        audience: impl Into<String>,
        client_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let domain = domain.into();
        let token_url = token_endpoint(&domain);
        Self {
            domain,
            audience: audience.into(),
            client_id: client_id.into(),
            username: username.into(),
            password: SecretString::from(password.into()),
            token_url,
        }
    }

    /// The identity tenant domain.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The API audience tokens are requested for.
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// The OAuth client identifier.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The username the grant authenticates as.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The token endpoint this grant posts to.
    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}

impl std::fmt::Debug for PasswordGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordGrant")
            .field("domain", &self.domain)
            .field("audience", &self.audience)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Machine-to-machine Client Credentials grant credentials.
///
/// Tokens issued this way carry no email claim, so user-scoped endpoints such
/// as `/graphql` may reject them.
#[derive(Clone)]
pub struct ClientCredentialsGrant {
    domain: String,
    audience: String,
    client_id: String,
    client_secret: SecretString,
    token_url: String,
}

impl ClientCredentialsGrant {
    /// Create client credentials grant credentials.
    pub fn new(
        domain: impl Into<String>,
        audience: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        let domain = domain.into();
        let token_url = token_endpoint(&domain);
        Self {
            domain,
            audience: audience.into(),
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            token_url,
        }
    }

    /// The identity tenant domain.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The API audience tokens are requested for.
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// The OAuth client identifier.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The token endpoint this grant posts to.
    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}

impl std::fmt::Debug for ClientCredentialsGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentialsGrant")
            .field("domain", &self.domain)
            .field("audience", &self.audience)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// A pre-obtained bearer token, used as-is with no refresh logic.
#[derive(Clone)]
pub struct StaticToken {
    token: SecretString,
}

impl StaticToken {
    /// Wrap an existing bearer token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }

    /// Get the token.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_token(&self) -> &str {
        self.token.expose_secret()
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// One way of obtaining a bearer token.
#[derive(Debug, Clone)]
pub enum CredentialStrategy {
    /// Resource Owner Password grant
    Password(PasswordGrant),
    /// Client Credentials grant
    ClientCredentials(ClientCredentialsGrant),
    /// Fixed token, never refreshed
    Static(StaticToken),
}

impl CredentialStrategy {
    /// Short name of the grant, used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Password(_) => "password",
            Self::ClientCredentials(_) => "client_credentials",
            Self::Static(_) => "static",
        }
    }

    /// Obtain a fresh token.
    ///
    /// The two OAuth grants post once to the identity endpoint using
    /// `identity_http`, which should carry [`IDENTITY_TIMEOUT`]. A static
    /// token returns immediately without I/O.
    ///
    /// Every failure is reported as [`HavonaError::Auth`].
    pub async fn fetch_token(
        &self,
        identity_http: &ClientWithMiddleware,
    ) -> Result<IssuedToken, HavonaError> {
        match self {
            Self::Password(grant) => {
                let request = TokenRequest::Password {
                    client_id: &grant.client_id,
                    audience: &grant.audience,
                    username: &grant.username,
                    password: grant.password.expose_secret(),
                    scope: PASSWORD_GRANT_SCOPE,
                };
                request_token(identity_http, &grant.token_url, &request).await
            }
            Self::ClientCredentials(grant) => {
                let request = TokenRequest::ClientCredentials {
                    client_id: &grant.client_id,
                    client_secret: grant.client_secret.expose_secret(),
                    audience: &grant.audience,
                };
                request_token(identity_http, &grant.token_url, &request).await
            }
            Self::Static(token) => Ok(IssuedToken {
                access_token: token.expose_token().to_string(),
                lifetime: TokenLifetime::Unbounded,
            }),
        }
    }

    /// Build a strategy from environment variables.
    ///
    /// Checked in order:
    ///
    /// 1. `HAVONA_TOKEN` for a static token
    /// 2. `AUTH0_DOMAIN`, `AUTH0_AUDIENCE`, `AUTH0_CLIENT_ID`, `HAVONA_EMAIL`,
    ///    `HAVONA_PASSWORD` for the password grant
    /// 3. `AUTH0_DOMAIN`, `AUTH0_AUDIENCE`, `AUTH0_M2M_CLIENT_ID`,
    ///    `AUTH0_M2M_CLIENT_SECRET` for the client credentials grant
    ///
    /// Returns `None` if no complete set is present.
    pub fn from_env() -> Option<Self> {
        if let Some(token) = env_var("HAVONA_TOKEN") {
            return Some(Self::Static(StaticToken::new(token)));
        }

        let domain = env_var("AUTH0_DOMAIN")?;
        let audience = env_var("AUTH0_AUDIENCE")?;

        if let (Some(client_id), Some(username), Some(password)) = (
            env_var("AUTH0_CLIENT_ID"),
            env_var("HAVONA_EMAIL"),
            env_var("HAVONA_PASSWORD"),
        ) {
            return Some(Self::Password(PasswordGrant::new(
                domain, audience, client_id, username, password,
            )));
        }

        let client_id = env_var("AUTH0_M2M_CLIENT_ID")?;
        let client_secret = env_var("AUTH0_M2M_CLIENT_SECRET")?;
        Some(Self::ClientCredentials(ClientCredentialsGrant::new(
            domain,
            audience,
            client_id,
            client_secret,
        )))
    }
}

impl From<PasswordGrant> for CredentialStrategy {
    fn from(grant: PasswordGrant) -> Self {
        Self::Password(grant)
    }
}

impl From<ClientCredentialsGrant> for CredentialStrategy {
    fn from(grant: ClientCredentialsGrant) -> Self {
        Self::ClientCredentials(grant)
    }
}

impl From<StaticToken> for CredentialStrategy {
    fn from(token: StaticToken) -> Self {
        Self::Static(token)
    }
}

/// Build the HTTP client used for identity endpoint requests.
pub(crate) fn identity_http_client(user_agent: &str) -> Result<ClientWithMiddleware, HavonaError> {
    identity_http_client_with_timeout(user_agent, IDENTITY_TIMEOUT)
}

pub(crate) fn identity_http_client_with_timeout(
    user_agent: &str,
    timeout: Duration,
) -> Result<ClientWithMiddleware, HavonaError> {
    let reqwest_client = reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?;

    Ok(ClientBuilder::new(reqwest_client)
        .with(TracingMiddleware::default())
        .build())
}

/// JSON body posted to the token endpoint.
#[derive(Serialize)]
#[serde(tag = "grant_type", rename_all = "snake_case")]
enum TokenRequest<'a> {
    Password {
        client_id: &'a str,
        audience: &'a str,
        username: &'a str,
        password: &'a str,
        scope: &'a str,
    },
    ClientCredentials {
        client_id: &'a str,
        client_secret: &'a str,
        audience: &'a str,
    },
}

#[serde_as]
#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    expires_in: Option<u64>,
}

async fn request_token(
    http: &ClientWithMiddleware,
    token_url: &str,
    request: &TokenRequest<'_>,
) -> Result<IssuedToken, HavonaError> {
    let payload = serde_json::to_vec(request)
        .map_err(|e| auth_error(format!("Failed to encode identity request: {e}")))?;

    let response = http
        .post(token_url)
        .header(CONTENT_TYPE, "application/json")
        .body(payload)
        .send()
        .await
        .map_err(|e| auth_error(format!("Identity request failed: {e}")))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| auth_error(format!("Identity request failed: {e}")))?;

    if !status.is_success() {
        return Err(HavonaError::Auth(ApiError::with_status(
            "Identity token request failed",
            status.as_u16(),
            truncate_chars(&body, MAX_IDENTITY_BODY_CHARS),
        )));
    }

    let parsed: TokenResponse = serde_json::from_str(&body)
        .map_err(|e| auth_error(format!("Identity response is not valid JSON: {e}")))?;

    let access_token = parsed
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| auth_error("Identity response missing access_token"))?;

    let lifetime = match parsed.expires_in {
        Some(seconds) => TokenLifetime::Seconds(seconds),
        None => TokenLifetime::Unspecified,
    };

    Ok(IssuedToken {
        access_token,
        lifetime,
    })
}

fn auth_error(message: impl Into<String>) -> HavonaError {
    HavonaError::Auth(ApiError::new(message))
}

fn token_endpoint(domain: &str) -> String {
    let domain = domain.trim_end_matches('/');
    if domain.contains("://") {
        format!("{domain}/oauth/token")
    } else {
        format!("https://{domain}/oauth/token")
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
