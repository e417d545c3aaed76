use std::sync::Arc;

use crate::data_models::SearchResult;
use crate::exa::{SearchBackend, SearchParams};

/// Score returned whenever the oracle can't give a usable answer.
pub const NEUTRAL_SCORE: f64 = 0.5;
/// Longest payload, in characters, sent to the oracle.
pub const MAX_PAYLOAD_CHARS: usize = 500;

/// Estimates query/result relevance by asking the search API itself.
pub struct RelevanceEvaluator<B> {
    backend: Arc<B>,
}

impl<B: SearchBackend> RelevanceEvaluator<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Relevance of `result` to `query` in [0, 1]. Never fails; falls back to
    /// [`NEUTRAL_SCORE`].
    pub async fn evaluate(&self, query: &str, result: &SearchResult) -> f64 {
        let prompt = relevance_prompt(query, &evaluation_payload(result));
        let params = SearchParams::neural(prompt, 1);

        match self.backend.search(&params).await {
            Ok(hits) => {
                let score = hits
                    .first()
                    .and_then(|hit| hit.get("score"))
                    .and_then(serde_json::Value::as_f64);
                match score {
                    Some(score) if score.is_finite() => score.clamp(0.0, 1.0),
                    _ => {
                        log::warn!("relevance oracle returned no usable score for {}", result.url);
                        NEUTRAL_SCORE
                    }
                }
            }
            Err(e) => {
                log::warn!("relevance evaluation failed for {}: {}", result.url, e);
                NEUTRAL_SCORE
            }
        }
    }
}

/// Text and highlights joined by spaces, or the title when both are empty,
/// cut to [`MAX_PAYLOAD_CHARS`] characters.
pub fn evaluation_payload(result: &SearchResult) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(result.highlights.len() + 1);
    if let Some(text) = result.text.as_deref().filter(|t| !t.is_empty()) {
        parts.push(text);
    }
    parts.extend(
        result
            .highlights
            .iter()
            .map(String::as_str)
            .filter(|h| !h.is_empty()),
    );

    let payload = if parts.is_empty() {
        result.title.clone()
    } else {
        parts.join(" ")
    };
    payload.chars().take(MAX_PAYLOAD_CHARS).collect()
}

pub fn relevance_prompt(query: &str, payload: &str) -> String {
    format!("Evaluate the relevance of the following content to the query \"{query}\": {payload}")
}
