//! Search-query expansion per financial instrument category.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum search queries generated for a custom instrument query.
const MAX_CUSTOM_QUERIES: usize = 3;

/// Financial instrument category used to widen a user query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Stock,
    Crypto,
    Commodity,
    RealEstate,
    Exchange,
    All,
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stock" => Ok(Category::Stock),
            "crypto" => Ok(Category::Crypto),
            "commodity" => Ok(Category::Commodity),
            "real_estate" => Ok(Category::RealEstate),
            "exchange" => Ok(Category::Exchange),
            "all" => Ok(Category::All),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::Stock => "stock",
            Category::Crypto => "crypto",
            Category::Commodity => "commodity",
            Category::RealEstate => "real_estate",
            Category::Exchange => "exchange",
            Category::All => "all",
        };
        write!(f, "{s}")
    }
}

/// Category-specific suffixes appended to a custom query.
fn custom_suffixes(category: Category) -> &'static [&'static str] {
    match category {
        Category::Stock => &["stock", "shares"],
        Category::Crypto => &["crypto", "cryptocurrency"],
        Category::Commodity => &["price", "market"],
        Category::RealEstate => &["real estate", "property"],
        Category::Exchange => &["exchange", "trading"],
        Category::All => &[],
    }
}

/// Default query sets used when no custom query is supplied.
fn default_queries(category: Category) -> &'static [&'static str] {
    match category {
        Category::Stock => &["stock market news", "equity market", "stock prices"],
        Category::Crypto => &["cryptocurrency news", "bitcoin market", "crypto prices"],
        Category::Commodity => &["commodity prices", "gold market", "oil prices"],
        Category::RealEstate => &["real estate market", "housing market", "property prices"],
        Category::Exchange => &["stock exchange news", "trading market", "financial markets"],
        Category::All => &["financial news", "market news", "economic news"],
    }
}

/// Generate the search queries for an instrument category.
///
/// With a custom query, returns the query itself plus category-flavored
/// variants ("gold" + commodity becomes "gold price", "gold market"),
/// capped at three. Without one, returns the category's default set.
#[must_use]
pub fn queries_for_category(category: Category, custom_query: Option<&str>) -> Vec<String> {
    let custom = custom_query.map(str::trim).filter(|q| !q.is_empty());
    let Some(custom) = custom else {
        return default_queries(category)
            .iter()
            .map(ToString::to_string)
            .collect();
    };

    let mut queries = vec![custom.to_string()];
    for suffix in custom_suffixes(category) {
        queries.push(format!("{custom} {suffix}"));
    }
    queries.truncate(MAX_CUSTOM_QUERIES);
    queries
}
