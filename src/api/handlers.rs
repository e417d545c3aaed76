use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;
use std::time::Instant;

use crate::data_models::{FeedbackEntry, Metrics, RankedResult};
use crate::error::SearchError;
use crate::exa::SearchBackend;
use crate::orchestrator::{AdvancedOptions, DEFAULT_NUM_RESULTS};

use super::AppState;
use super::models::{
    FeedbackRequest, FeedbackResponse, SearchRequest, SearchResponse, SimilarRequest,
};

type ApiError = (StatusCode, String);

pub async fn search_handler<B: SearchBackend>(
    State(state): State<Arc<AppState<B>>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = Instant::now();

    if request.query.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Query cannot be empty".to_string()));
    }

    let num_results = request.num_results.unwrap_or(DEFAULT_NUM_RESULTS);
    let results = if request.advanced {
        let options = AdvancedOptions {
            num_results,
            include_text: request.include_text,
            include_highlights: request.include_highlights,
            category: request.category,
        };
        state.orchestrator.advanced_search(&request.query, &options).await
    } else {
        state
            .orchestrator
            .basic_search(&request.query, num_results)
            .await
    }
    .map_err(search_error)?;

    Ok(Json(respond(request.query, results, start)))
}

pub async fn similar_handler<B: SearchBackend>(
    State(state): State<Arc<AppState<B>>>,
    Json(request): Json<SimilarRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = Instant::now();

    if request.url.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "URL cannot be empty".to_string()));
    }

    let results = state
        .orchestrator
        .find_similar_documents(
            &request.url,
            request.num_results.unwrap_or(DEFAULT_NUM_RESULTS),
            request.exclude_source_domain,
        )
        .await
        .map_err(search_error)?;

    Ok(Json(respond(request.url, results, start)))
}

// The feedback log is plain file I/O, so it runs off the async workers.

pub async fn add_feedback_handler<B: SearchBackend + 'static>(
    State(state): State<Arc<AppState<B>>>,
    Json(request): Json<FeedbackRequest>,
) -> Json<FeedbackResponse> {
    let saved = tokio::task::spawn_blocking(move || {
        state.feedback.add_feedback(
            &request.query,
            &request.result,
            request.feedback,
            request.ai_score,
        )
    })
    .await
    .unwrap_or_else(|e| {
        log::error!("Feedback write task failed: {}", e);
        false
    });
    Json(FeedbackResponse { saved })
}

pub async fn feedback_history_handler<B: SearchBackend + 'static>(
    State(state): State<Arc<AppState<B>>>,
) -> Json<Vec<FeedbackEntry>> {
    let history = tokio::task::spawn_blocking(move || state.feedback.get_feedback_history())
        .await
        .unwrap_or_else(|e| {
            log::error!("Feedback read task failed: {}", e);
            Vec::new()
        });
    Json(history)
}

pub async fn metrics_handler<B: SearchBackend + 'static>(
    State(state): State<Arc<AppState<B>>>,
) -> Json<Metrics> {
    let metrics = tokio::task::spawn_blocking(move || state.feedback.get_metrics())
        .await
        .unwrap_or_else(|e| {
            log::error!("Metrics task failed: {}", e);
            Metrics::default()
        });
    Json(metrics)
}

fn respond(query: String, results: Vec<RankedResult>, start: Instant) -> SearchResponse {
    SearchResponse {
        query,
        total_results: results.len(),
        results,
        processing_time_ms: start.elapsed().as_millis(),
    }
}

fn search_error(e: SearchError) -> ApiError {
    log::error!("{e}");
    (StatusCode::BAD_GATEWAY, e.to_string())
}
