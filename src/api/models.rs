use serde::{Deserialize, Serialize};

use crate::data_models::{Category, Feedback, RankedResult, SearchResult};

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub num_results: Option<usize>,
    #[serde(default)]
    pub advanced: bool,
    #[serde(default = "default_true")]
    pub include_text: bool,
    #[serde(default = "default_true")]
    pub include_highlights: bool,
    pub category: Option<Category>,
}

#[derive(Debug, Deserialize)]
pub struct SimilarRequest {
    pub url: String,
    pub num_results: Option<usize>,
    #[serde(default = "default_true")]
    pub exclude_source_domain: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<RankedResult>,
    pub total_results: usize,
    pub processing_time_ms: u128,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub query: String,
    pub result: SearchResult,
    pub feedback: Feedback,
    pub ai_score: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub saved: bool,
}

fn default_true() -> bool {
    true
}
