use std::sync::Arc;

use crate::config::Config;
use crate::data_models::{Category, RankedResult, SearchResult};
use crate::error::{Result, SearchError};
use crate::exa::{ContentOptions, ExaClient, SearchBackend, SearchParams, SimilarParams};
use crate::ranker::Ranker;

pub const DEFAULT_NUM_RESULTS: usize = 5;
pub const MAX_NUM_RESULTS: usize = 100;

/// Options for [`SearchOrchestrator::advanced_search`].
#[derive(Debug, Clone, PartialEq)]
pub struct AdvancedOptions {
    pub num_results: usize,
    pub include_text: bool,
    pub include_highlights: bool,
    pub category: Option<Category>,
}

impl Default for AdvancedOptions {
    fn default() -> Self {
        Self {
            num_results: DEFAULT_NUM_RESULTS,
            include_text: true,
            include_highlights: true,
            category: None,
        }
    }
}

/// Runs a retrieval against the search API and re-ranks what comes back.
pub struct SearchOrchestrator<B> {
    backend: Arc<B>,
    ranker: Ranker<B>,
}

impl SearchOrchestrator<ExaClient> {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(ExaClient::new(config)?))
    }
}

impl<B: SearchBackend> SearchOrchestrator<B> {
    pub fn new(backend: B) -> Self {
        let backend = Arc::new(backend);
        Self {
            ranker: Ranker::new(backend.clone()),
            backend,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn basic_search(&self, query: &str, num_results: usize) -> Result<Vec<RankedResult>> {
        let query = query.trim();
        let num_results = clamp_num_results(num_results);
        let params = SearchParams::neural(query, num_results);

        let hits = self
            .backend
            .search(&params)
            .await
            .map_err(|e| SearchError::SearchFailure(format!("Search failed: {e}")))?;

        log::info!("basic search '{query}' returned {} hits", hits.len());
        Ok(self.ranker.rerank(query, parse_hits(&hits, num_results)).await)
    }

    pub async fn advanced_search(
        &self,
        query: &str,
        options: &AdvancedOptions,
    ) -> Result<Vec<RankedResult>> {
        let query = query.trim();
        let num_results = clamp_num_results(options.num_results);
        let params = SearchParams {
            contents: Some(ContentOptions {
                text: options.include_text,
                highlights: options.include_highlights,
            }),
            category: options.category,
            ..SearchParams::neural(query, num_results)
        };

        let hits = self
            .backend
            .search(&params)
            .await
            .map_err(|e| SearchError::SearchFailure(format!("Advanced search failed: {e}")))?;

        log::info!(
            "advanced search '{query}' (category: {}) returned {} hits",
            options.category.map_or("any", |c| c.as_str()),
            hits.len()
        );
        Ok(self.ranker.rerank(query, parse_hits(&hits, num_results)).await)
    }

    /// Documents similar to `url`. The URL doubles as the query when re-ranking.
    pub async fn find_similar_documents(
        &self,
        url: &str,
        num_results: usize,
        exclude_source_domain: bool,
    ) -> Result<Vec<RankedResult>> {
        let url = url.trim();
        let num_results = clamp_num_results(num_results);
        let params = SimilarParams {
            url: url.to_string(),
            num_results,
            exclude_source_domain,
        };

        let hits = self.backend.find_similar(&params).await.map_err(|e| {
            SearchError::SearchFailure(format!("Similar document search failed: {e}"))
        })?;

        log::info!("similar search for {url} returned {} hits", hits.len());
        Ok(self.ranker.rerank(url, parse_hits(&hits, num_results)).await)
    }
}

pub fn clamp_num_results(num_results: usize) -> usize {
    num_results.clamp(1, MAX_NUM_RESULTS)
}

fn parse_hits(hits: &[serde_json::Value], limit: usize) -> Vec<SearchResult> {
    hits.iter().take(limit).map(SearchResult::from_raw).collect()
}

#[test]
fn test_clamp_num_results() {
    assert_eq!(clamp_num_results(0), 1);
    assert_eq!(clamp_num_results(1), 1);
    assert_eq!(clamp_num_results(25), 25);
    assert_eq!(clamp_num_results(100), 100);
    assert_eq!(clamp_num_results(5000), MAX_NUM_RESULTS);
}

#[test]
fn test_parse_hits_respects_limit() {
    let hits: Vec<serde_json::Value> = (0..8)
        .map(|i| serde_json::json!({"url": format!("https://{i}.com"), "score": 0.1}))
        .collect();
    let parsed = parse_hits(&hits, 5);
    assert_eq!(parsed.len(), 5);
    assert_eq!(parsed[4].url, "https://4.com");
}
