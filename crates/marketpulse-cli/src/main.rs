use std::time::Duration;

use clap::{Parser, Subcommand};

use marketpulse_core::{queries_for_category, AnalysisReport, Category, SentimentLabel};
use marketpulse_pipeline::Pipeline;

#[derive(Debug, Parser)]
#[command(name = "marketpulse-cli")]
#[command(about = "Market sentiment analysis command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a sentiment analysis and print the report
    Analyze {
        /// Instrument to analyze, e.g. "gold" or "bitcoin"
        #[arg(long, default_value = "gold")]
        query: String,

        /// Instrument category used to widen the search
        #[arg(long, default_value = "commodity")]
        category: String,

        /// Feed entries fetched per search query (defaults to config)
        #[arg(long)]
        limit: Option<usize>,

        /// Wall-clock budget in seconds for the run (defaults to config)
        #[arg(long)]
        budget: Option<u64>,

        /// Print the raw JSON report instead of a summary
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            query,
            category,
            limit,
            budget,
            json,
        } => run_analyze(&query, &category, limit, budget, json).await,
    }
}

async fn run_analyze(
    query: &str,
    category: &str,
    limit: Option<usize>,
    budget: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let config = marketpulse_core::load_app_config()?;
    let category: Category = category
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let queries = queries_for_category(category, Some(query));
    let article_limit = limit.unwrap_or(config.articles_per_query);
    let time_budget = Duration::from_secs(budget.unwrap_or(config.analysis_timeout_secs));

    let pipeline = Pipeline::new(&config)?;
    let report = pipeline
        .run_analysis(&queries, article_limit, time_budget)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(query, &report);
    }
    Ok(())
}

fn print_summary(query: &str, report: &AnalysisReport) {
    println!("Sentiment analysis for \"{query}\"");
    println!(
        "  signal: {}  (net score {:+.3})",
        report.market_signal, report.net_sentiment_score
    );
    println!(
        "  articles: {}  processed in {:.1}s",
        report.total_articles, report.processing_time
    );
    for label in SentimentLabel::all() {
        let count = report.sentiment_distribution.get(&label).copied().unwrap_or(0);
        println!("    {label}: {count}");
    }
    println!();
    for analyzed in &report.articles {
        let marker = if analyzed.degraded { "~" } else { " " };
        println!(
            "  {marker}[{}] {}  ({:.0}% conf)",
            analyzed.content_sentiment.label,
            analyzed.article.title,
            analyzed.content_sentiment.confidence * 100.0
        );
    }
}
