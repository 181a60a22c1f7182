//! Authentication module for the Havona API.
//!
//! This module provides:
//! - Credential strategies (password grant, client credentials, static token)
//! - A single-slot token cache with early refresh and single-flight fetching
//! - Injectable monotonic clocks for deterministic expiry

mod clock;
mod credentials;
mod token_cache;

pub use clock::{Clock, ManualClock, SystemClock};
pub use credentials::{
    ClientCredentialsGrant, CredentialStrategy, IDENTITY_TIMEOUT, IssuedToken,
    PASSWORD_GRANT_SCOPE, PasswordGrant, StaticToken, TokenLifetime,
};
pub use token_cache::{DEFAULT_TOKEN_TTL, REFRESH_SKEW, TokenCache};

pub(crate) use credentials::identity_http_client;
