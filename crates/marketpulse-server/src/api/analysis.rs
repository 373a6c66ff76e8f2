//! Analysis trigger and progress handlers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use marketpulse_core::{queries_for_category, AnalysisReport, Category};
use marketpulse_pipeline::{PipelineError, Progress};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// In-memory TTL cache of the latest completed report per query.
///
/// Stands in for durable report storage, which this service does not
/// do: a repeated dashboard request inside the TTL window reuses the
/// last report instead of re-running the pipeline.
#[derive(Clone, Default)]
pub struct ReportCache {
    entries: Arc<Mutex<HashMap<String, CachedReport>>>,
}

struct CachedReport {
    stored_at: Instant,
    report: AnalysisReport,
}

impl ReportCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn get(&self, key: &str, ttl: Duration) -> Option<AnalysisReport> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|cached| cached.stored_at.elapsed() < ttl)
            .map(|cached| cached.report.clone())
    }

    async fn put(&self, key: String, report: AnalysisReport) {
        let mut entries = self.entries.lock().await;
        entries.retain(|_, cached| cached.stored_at.elapsed() < Duration::from_secs(86_400));
        entries.insert(
            key,
            CachedReport {
                stored_at: Instant::now(),
                report,
            },
        );
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct StartAnalysisRequest {
    query: Option<String>,
    category: Option<String>,
    /// Skip the report cache and force a fresh run.
    #[serde(default)]
    force: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct AnalysisData {
    query: String,
    category: Category,
    cached: bool,
    report: AnalysisReport,
}

pub(super) async fn start_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<ApiResponse<AnalysisData>>, ApiError> {
    // A missing or empty body means "analyze the default instrument".
    let request: StartAnalysisRequest = if body.is_empty() {
        StartAnalysisRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            ApiError::new(
                req_id.0.clone(),
                "bad_request",
                format!("invalid JSON body: {e}"),
            )
        })?
    };
    let query = request
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or("gold")
        .to_string();
    let category: Category = request
        .category
        .as_deref()
        .unwrap_or("commodity")
        .parse()
        .map_err(|e: String| ApiError::new(req_id.0.clone(), "validation_error", e))?;

    let cache_key = format!("{category}:{}", query.to_lowercase());
    let ttl = Duration::from_secs(state.config.cache_ttl_secs);

    if !request.force {
        if let Some(report) = state.cache.get(&cache_key, ttl).await {
            tracing::debug!(query = %query, "serving cached analysis report");
            return Ok(Json(ApiResponse {
                data: AnalysisData {
                    query,
                    category,
                    cached: true,
                    report,
                },
                meta: ResponseMeta::new(req_id.0),
            }));
        }
    }

    let queries = queries_for_category(category, Some(&query));
    let report = state
        .pipeline
        .run_analysis(
            &queries,
            state.config.articles_per_query,
            Duration::from_secs(state.config.analysis_timeout_secs),
        )
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;

    state.cache.put(cache_key, report.clone()).await;

    Ok(Json(ApiResponse {
        data: AnalysisData {
            query,
            category,
            cached: false,
            report,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn analysis_progress(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Progress>> {
    let progress = *state.pipeline.subscribe_progress().borrow();
    Json(ApiResponse {
        data: progress,
        meta: ResponseMeta::new(req_id.0),
    })
}

fn map_pipeline_error(request_id: String, error: &PipelineError) -> ApiError {
    match error {
        PipelineError::InvalidQuery(reason) => {
            ApiError::new(request_id, "validation_error", reason.clone())
        }
        PipelineError::News(e) => {
            tracing::error!(error = %e, "analysis run failed");
            ApiError::new(
                request_id,
                "upstream_error",
                "no news feed queries could be searched",
            )
        }
    }
}
