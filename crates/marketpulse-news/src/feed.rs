//! Google News RSS feed search.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;

use crate::error::NewsError;

/// Default feed host; overridden in tests to point at a mock server.
pub const DEFAULT_FEED_BASE: &str = "https://news.google.com";

/// One candidate entry from a news feed: headline, link, publication date.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub published: Option<String>,
}

/// Search the news feed for a query and return up to `limit` items.
///
/// A transient transport failure is retried once before the query is
/// given up on; non-2xx responses are not retried.
///
/// # Errors
///
/// Returns [`NewsError::Http`] on network failure (after the retry),
/// [`NewsError::UnexpectedStatus`] on a non-2xx response, or
/// [`NewsError::Xml`] on malformed feed XML.
pub async fn search_news(
    client: &Client,
    feed_base: &str,
    query: &str,
    limit: usize,
) -> Result<Vec<FeedItem>, NewsError> {
    let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC).to_string();
    let url = format!("{feed_base}/rss/search?q={encoded}&hl=en-US&gl=US&ceid=US:en");

    let body = match fetch_feed_body(client, &url).await {
        Ok(body) => body,
        Err(NewsError::Http(e)) => {
            tracing::warn!(query, error = %e, "feed fetch failed — retrying once");
            fetch_feed_body(client, &url).await?
        }
        Err(e) => return Err(e),
    };

    parse_feed(&body, limit)
}

async fn fetch_feed_body(client: &Client, url: &str) -> Result<String, NewsError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(NewsError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response.text().await?)
}

/// Parse an RSS XML body into [`FeedItem`]s.
///
/// Extracts `<item>` elements, pulling `<title>`, `<link>`, and
/// `<pubDate>`. Items missing a title or link are skipped. Stops after
/// `limit` items have been collected.
///
/// # Errors
///
/// Returns [`NewsError::Xml`] if the XML is malformed.
pub fn parse_feed(xml: &str, limit: usize) -> Result<Vec<FeedItem>, NewsError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut in_item = false;
    let mut current_tag = String::new();
    let mut title = String::new();
    let mut link = String::new();
    let mut published = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("").to_string();
                if name == "item" {
                    in_item = true;
                    title.clear();
                    link.clear();
                    published.clear();
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("");
                if name == "item" && in_item {
                    in_item = false;
                    if !title.is_empty() && !link.is_empty() {
                        items.push(FeedItem {
                            title: title.clone(),
                            link: link.clone(),
                            published: if published.is_empty() {
                                None
                            } else {
                                Some(published.clone())
                            },
                        });
                        if items.len() >= limit {
                            break;
                        }
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if in_item {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    match current_tag.as_str() {
                        "title" => title = text,
                        "link" => link = text,
                        "pubDate" => published = text,
                        _ => {}
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if in_item {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    match current_tag.as_str() {
                        "title" => title = text,
                        "link" => link = text,
                        "pubDate" => published = text,
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(NewsError::Xml(e)),
            _ => {}
        }
    }

    Ok(items)
}
