//! Error types for the Havona client library.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Maximum number of body characters kept on errors raised by the platform transport.
pub const MAX_ERROR_BODY_CHARS: usize = 500;

/// Maximum number of body characters shown by [`ApiError`]'s `Display` impl.
const DISPLAY_BODY_CHARS: usize = 200;

/// The main error type for all Havona client operations.
#[derive(Error, Debug)]
pub enum HavonaError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Reading an upload from disk failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Identity endpoint failure, or HTTP 401/403 from the platform
    #[error("Authentication error: {0}")]
    Auth(ApiError),

    /// HTTP 404, or a read that resolved to no record
    #[error("Not found: {0}")]
    NotFound(ApiError),

    /// HTTP 400/422, the payload was rejected by server-side validation
    #[error("Validation error: {0}")]
    Validation(ApiError),

    /// GraphQL envelope carried a non-empty `errors` array
    #[error("{0}")]
    GraphQl(GraphQlError),

    /// Any other non-success status from the platform
    #[error("Havona API error: {0}")]
    Api(ApiError),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Missing required credentials
    #[error("Missing credentials: a credential strategy is required to build a client")]
    MissingCredentials,

    /// Client configuration is incomplete or invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HavonaError {
    /// Classify a non-success platform response.
    ///
    /// The body is truncated to [`MAX_ERROR_BODY_CHARS`] before it is stored.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let body = truncate_chars(body, MAX_ERROR_BODY_CHARS);
        let code = status.as_u16();
        match code {
            401 => Self::Auth(ApiError::with_status("Authentication failed", code, body)),
            403 => Self::Auth(ApiError::with_status(
                "Forbidden: insufficient permissions",
                code,
                body,
            )),
            404 => Self::NotFound(ApiError::with_status("Resource not found", code, body)),
            400 | 422 => Self::Validation(ApiError::with_status("Validation error", code, body)),
            _ => Self::Api(ApiError::with_status("Request failed", code, body)),
        }
    }

    /// The API error details, for variants that carry them.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Auth(e) | Self::NotFound(e) | Self::Validation(e) | Self::Api(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        self.api_error().and_then(|e| e.status)
    }

    /// Truncated response body associated with this error, if any.
    pub fn response_body(&self) -> Option<&str> {
        self.api_error().and_then(|e| e.body.as_deref())
    }

    /// Check if this is an authentication or authorization failure.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if the underlying HTTP request timed out.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout(),
            Self::HttpMiddleware(reqwest_middleware::Error::Reqwest(e)) => e.is_timeout(),
            _ => false,
        }
    }
}

/// Error details returned alongside a failed platform or identity request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Human-readable error message
    pub message: String,
    /// HTTP status code, when the failure came from a response
    pub status: Option<u16>,
    /// Truncated response body, when one was received
    pub body: Option<String>,
}

impl ApiError {
    /// Create an error that carries only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            body: None,
        }
    }

    /// Create an error from a message, a status code and a response body.
    ///
    /// An empty body is stored as `None`.
    pub fn with_status(message: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            message: message.into(),
            status: Some(status),
            body: (!body.is_empty()).then_some(body),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(status) = self.status {
            write!(f, " (HTTP {status})")?;
        }
        if let Some(body) = &self.body {
            write!(f, ": {}", truncate_chars(body, DISPLAY_BODY_CHARS))?;
        }
        Ok(())
    }
}

/// Errors reported inside a GraphQL response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQlError {
    /// The raw error objects as returned by the server
    pub errors: Vec<Value>,
}

impl GraphQlError {
    /// Wrap the raw `errors` array of a GraphQL response.
    pub fn new(errors: Vec<Value>) -> Self {
        Self { errors }
    }

    /// The `message` of each error, or its JSON text when it has none.
    pub fn messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|e| match e.get("message").and_then(Value::as_str) {
                Some(message) => message.to_string(),
                None => e.to_string(),
            })
            .collect()
    }
}

impl std::fmt::Display for GraphQlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GraphQL errors: {:?}", self.messages())
    }
}

/// Truncate a string to at most `max` characters, respecting char boundaries.
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
