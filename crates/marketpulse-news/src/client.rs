//! Outbound HTTP client construction.

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::Client;

use crate::error::NewsError;

/// Maximum redirect hops the resolver client will follow before giving up.
const MAX_REDIRECT_HOPS: usize = 5;

/// Build the general-purpose client used for feed fetches and content
/// extraction: per-request timeout, connect timeout, and `User-Agent`.
///
/// # Errors
///
/// Returns [`NewsError::Http`] if the underlying `reqwest::Client`
/// cannot be constructed (e.g., invalid TLS config).
pub fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client, NewsError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Build the redirect-resolution client: a short timeout and a bounded
/// redirect policy so one bad link cannot stall a batch.
///
/// # Errors
///
/// Returns [`NewsError::Http`] if the client cannot be constructed.
pub fn build_resolver_client(timeout_secs: u64, user_agent: &str) -> Result<Client, NewsError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECT_HOPS))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}
