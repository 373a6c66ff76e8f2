//! News discovery for the marketpulse analysis pipeline.
//!
//! Searches Google News RSS for one or more queries, resolves feed
//! indirection links to real publisher URLs, extracts article bodies,
//! and deduplicates the batch into a list of normalized [`Article`]s
//! ready for sentiment scoring.
//!
//! [`Article`]: marketpulse_core::Article

pub mod aggregator;
pub mod error;
pub mod extract;
pub mod feed;
pub mod resolve;

mod client;

pub use aggregator::NewsAggregator;
pub use client::{build_http_client, build_resolver_client};
pub use error::NewsError;
pub use feed::FeedItem;
