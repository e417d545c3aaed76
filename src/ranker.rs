use std::cmp::Ordering;
use std::sync::Arc;

use crate::data_models::{RankedResult, SearchResult};
use crate::evaluator::RelevanceEvaluator;
use crate::exa::SearchBackend;

pub const RETRIEVAL_WEIGHT: f64 = 0.3;
pub const AI_WEIGHT: f64 = 0.7;

pub fn blend_score(original: f64, ai_score: f64) -> f64 {
    RETRIEVAL_WEIGHT * original + AI_WEIGHT * ai_score
}

/// Attach blended scores to already-evaluated results and sort them best first.
///
/// The sort is stable, so equal scores keep their retrieval order.
pub fn rank(evaluated: Vec<(SearchResult, f64)>) -> Vec<RankedResult> {
    let mut ranked: Vec<RankedResult> = evaluated
        .into_iter()
        .map(|(result, ai_score)| {
            let original_score = result.score;
            RankedResult {
                result: SearchResult {
                    score: blend_score(original_score, ai_score),
                    ..result
                },
                ai_score,
                original_score,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score().partial_cmp(&a.score()).unwrap_or(Ordering::Equal));
    ranked
}

pub struct Ranker<B> {
    evaluator: RelevanceEvaluator<B>,
}

impl<B: SearchBackend> Ranker<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            evaluator: RelevanceEvaluator::new(backend),
        }
    }

    /// Evaluate every result against `query` one at a time, then rank.
    pub async fn rerank(&self, query: &str, results: Vec<SearchResult>) -> Vec<RankedResult> {
        let mut evaluated = Vec::with_capacity(results.len());
        for result in results {
            let ai_score = self.evaluator.evaluate(query, &result).await;
            log::debug!("ai score {:.4} for {}", ai_score, result.url);
            evaluated.push((result, ai_score));
        }
        rank(evaluated)
    }
}
