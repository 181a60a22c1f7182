//! Single-slot bearer token cache.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest_middleware::ClientWithMiddleware;
use tokio::sync::Mutex;
use tracing::debug;

use crate::auth::clock::{Clock, SystemClock};
use crate::auth::credentials::{CredentialStrategy, TokenLifetime, identity_http_client};
use crate::error::HavonaError;

/// Tokens are treated as expired this long before the issuer says they are.
pub const REFRESH_SKEW: Duration = Duration::from_secs(60);

/// TTL applied when the issuer omits `expires_in`.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(86_400);

/// A token held by the cache together with the moment it was obtained.
struct CachedToken {
    token: String,
    obtained_at: Instant,
    /// `None` never expires.
    ttl: Option<Duration>,
}

impl CachedToken {
    fn is_valid_at(&self, now: Instant) -> bool {
        let Some(ttl) = self.ttl else {
            return true;
        };
        let Some(usable) = ttl.checked_sub(REFRESH_SKEW) else {
            return false;
        };
        // An expiry past the end of `Instant`'s range never arrives.
        self.obtained_at
            .checked_add(usable)
            .is_none_or(|expiry| now < expiry)
    }
}

/// Caches at most one bearer token obtained from a [`CredentialStrategy`].
///
/// [`get_token`](Self::get_token) reuses the cached token until
/// [`REFRESH_SKEW`] before its expiry, then fetches a new one on the calling
/// task. The slot stays locked for the whole check-fetch-store sequence, so
/// concurrent callers in an expired window share a single identity request.
///
/// A failed fetch leaves the slot as it was.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use havona_client::auth::{CredentialStrategy, PasswordGrant, TokenCache};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let grant = PasswordGrant::new(
///         "tenant.us.auth0.com",
///         "https://api.example.com",
///         "client-id",
///         "trader@example.com",
///         "password",
///     );
///     let cache = TokenCache::new(Arc::new(CredentialStrategy::from(grant)))?;
///     let token = cache.get_token().await?;
///     println!("Got a token of {} bytes", token.len());
///     Ok(())
/// }
/// ```
pub struct TokenCache {
    strategy: Arc<CredentialStrategy>,
    identity_http: ClientWithMiddleware,
    clock: Arc<dyn Clock>,
    slot: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    /// Create an empty cache using the system clock.
    pub fn new(strategy: Arc<CredentialStrategy>) -> Result<Self, HavonaError> {
        Self::with_clock(strategy, Arc::new(SystemClock))
    }

    /// Create an empty cache reading time from `clock`.
    pub fn with_clock(
        strategy: Arc<CredentialStrategy>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, HavonaError> {
        let user_agent = format!("havona-client/{}", env!("CARGO_PKG_VERSION"));
        let identity_http = identity_http_client(&user_agent)?;
        Ok(Self::with_parts(strategy, identity_http, clock))
    }

    pub(crate) fn with_parts(
        strategy: Arc<CredentialStrategy>,
        identity_http: ClientWithMiddleware,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            strategy,
            identity_http,
            clock,
            slot: Mutex::new(None),
        }
    }

    /// The strategy this cache fetches tokens from.
    pub fn strategy(&self) -> &Arc<CredentialStrategy> {
        &self.strategy
    }

    /// Return a valid token, fetching a new one only when needed.
    pub async fn get_token(&self) -> Result<String, HavonaError> {
        self.obtain(false).await
    }

    /// Fetch a new token regardless of the cached one's validity.
    pub async fn force_refresh(&self) -> Result<String, HavonaError> {
        self.obtain(true).await
    }

    /// Check whether a cached token is currently usable, without fetching.
    pub async fn has_valid_token(&self) -> bool {
        let slot = self.slot.lock().await;
        slot.as_ref()
            .is_some_and(|cached| cached.is_valid_at(self.clock.now()))
    }

    async fn obtain(&self, force_refresh: bool) -> Result<String, HavonaError> {
        let mut slot = self.slot.lock().await;

        if !force_refresh {
            if let Some(cached) = slot.as_ref() {
                if cached.is_valid_at(self.clock.now()) {
                    debug!(grant = self.strategy.kind(), "Using cached token");
                    return Ok(cached.token.clone());
                }
                debug!(grant = self.strategy.kind(), "Cached token expired, refreshing");
            }
        }

        debug!(
            grant = self.strategy.kind(),
            forced = force_refresh,
            had_token = slot.is_some(),
            "Fetching new token"
        );

        let issued = self.strategy.fetch_token(&self.identity_http).await?;
        let ttl = match issued.lifetime {
            TokenLifetime::Seconds(seconds) => Some(Duration::from_secs(seconds)),
            TokenLifetime::Unspecified => Some(DEFAULT_TOKEN_TTL),
            TokenLifetime::Unbounded => None,
        };

        debug!(grant = self.strategy.kind(), ttl_secs = ?ttl.map(|t| t.as_secs()), "Got new token");

        let token = issued.access_token;
        *slot = Some(CachedToken {
            token: token.clone(),
            obtained_at: self.clock.now(),
            ttl,
        });

        Ok(token)
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}
