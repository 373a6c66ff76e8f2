//! Feed indirection link resolution.
//!
//! Feed entries point at wrapper URLs rather than the publisher page.
//! Resolution first looks for an embedded target-URL parameter, then
//! follows the redirect chain with the bounded resolver client. It never
//! fails: any parse, network, or timeout problem falls back to the
//! original link.

use reqwest::{Client, Url};

/// Hosts whose links embed the real target in a `url` query parameter.
const INDIRECTION_HOSTS: &[&str] = &["news.google.com"];

/// Resolve a feed link to the real publisher URL.
///
/// Returns the input unchanged when resolution is not possible.
/// Resolving an already-resolved URL is a no-op apart from one cheap
/// HEAD round trip.
pub async fn resolve_url(client: &Client, url: &str) -> String {
    if let Some(target) = embedded_target_url(url) {
        return target;
    }

    match client.head(url).send().await {
        Ok(response) => response.url().to_string(),
        Err(e) => {
            tracing::debug!(url, error = %e, "redirect resolution failed — keeping feed link");
            url.to_string()
        }
    }
}

/// Fast path: extract the `url` query parameter from a known
/// indirection host, without any network traffic.
fn embedded_target_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    if !INDIRECTION_HOSTS.iter().any(|h| host == *h) {
        return None;
    }
    parsed
        .query_pairs()
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
}
