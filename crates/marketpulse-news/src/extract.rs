//! Main-body text extraction from publisher pages.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use scraper::{Html, Selector};

/// Fetch a publisher page and extract its main article text.
///
/// All failure modes — non-2xx response, timeout, non-HTML content
/// type, parse failure, or extracted text below `min_content_length`
/// characters — yield `None`. The caller treats `None` as the signal to
/// fall back to headline-only analysis; it is never an error.
pub async fn extract_content(
    client: &Client,
    url: &str,
    min_content_length: usize,
) -> Option<String> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!(url, error = %e, "content fetch failed");
            return None;
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::debug!(url, status = status.as_u16(), "content fetch returned non-2xx");
        return None;
    }

    if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
        let is_html = content_type
            .to_str()
            .is_ok_and(|v| v.contains("html") || v.contains("xhtml"));
        if !is_html {
            tracing::debug!(url, "skipping non-HTML content");
            return None;
        }
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(url, error = %e, "content body read failed");
            return None;
        }
    };

    let text = extract_paragraph_text(&body);
    if text.len() >= min_content_length {
        Some(text)
    } else {
        tracing::debug!(url, extracted_len = text.len(), "extracted text below quality threshold");
        None
    }
}

/// Pull paragraph text out of an HTML document.
///
/// Prefers paragraphs inside an `<article>` element; falls back to all
/// `<p>` elements when none are found. Script and style content never
/// appears because only paragraph text nodes are collected.
fn extract_paragraph_text(html: &str) -> String {
    let document = Html::parse_document(html);

    // Selector::parse only fails on invalid selector syntax, which these are not.
    let Ok(article_selector) = Selector::parse("article p") else {
        return String::new();
    };
    let Ok(paragraph_selector) = Selector::parse("p") else {
        return String::new();
    };

    let mut paragraphs: Vec<String> = document
        .select(&article_selector)
        .map(|p| p.text().collect::<Vec<_>>().join(" "))
        .collect();

    if paragraphs.is_empty() {
        paragraphs = document
            .select(&paragraph_selector)
            .map(|p| p.text().collect::<Vec<_>>().join(" "))
            .collect();
    }

    let joined = paragraphs.join(" ");
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}
