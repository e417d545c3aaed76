#![allow(dead_code)]

use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;

use sieve::error::{Result, SearchError};
use sieve::exa::{SearchBackend, SearchParams, SimilarParams};

/// In-memory stand-in for the search API.
///
/// Retrieval calls return `hits`. Relevance-oracle calls (queries starting with
/// the evaluation instruction) return the score of the first `oracle` marker
/// found in the prompt, or nothing.
#[derive(Default)]
pub struct FakeBackend {
    pub hits: Vec<Value>,
    pub oracle: HashMap<String, f64>,
    pub fail_search: bool,
    pub fail_oracle: bool,
    pub searches: Mutex<Vec<SearchParams>>,
    pub similar: Mutex<Vec<SimilarParams>>,
}

impl FakeBackend {
    pub fn with_hits(hits: Vec<Value>) -> Self {
        Self {
            hits,
            ..Default::default()
        }
    }

    pub fn oracle_score(mut self, marker: &str, score: f64) -> Self {
        self.oracle.insert(marker.to_string(), score);
        self
    }

    pub fn retrieval_calls(&self) -> Vec<SearchParams> {
        self.searches
            .lock()
            .unwrap()
            .iter()
            .filter(|p| !is_oracle_call(p))
            .cloned()
            .collect()
    }

    pub fn oracle_calls(&self) -> Vec<SearchParams> {
        self.searches
            .lock()
            .unwrap()
            .iter()
            .filter(|p| is_oracle_call(p))
            .cloned()
            .collect()
    }

    fn answer_oracle(&self, params: &SearchParams) -> Result<Vec<Value>> {
        if self.fail_oracle {
            return Err(SearchError::Http("oracle unavailable".into()));
        }
        Ok(self
            .oracle
            .iter()
            .find(|(marker, _)| params.query.contains(marker.as_str()))
            .map(|(_, score)| vec![json!({"title": "oracle", "url": "#", "score": score})])
            .unwrap_or_default())
    }
}

impl SearchBackend for FakeBackend {
    async fn search(&self, params: &SearchParams) -> Result<Vec<Value>> {
        self.searches.lock().unwrap().push(params.clone());
        if is_oracle_call(params) {
            return self.answer_oracle(params);
        }
        if self.fail_search {
            return Err(SearchError::Http("connection refused".into()));
        }
        Ok(self.hits.clone())
    }

    async fn find_similar(&self, params: &SimilarParams) -> Result<Vec<Value>> {
        self.similar.lock().unwrap().push(params.clone());
        if self.fail_search {
            return Err(SearchError::Http("connection refused".into()));
        }
        Ok(self.hits.clone())
    }
}

pub fn is_oracle_call(params: &SearchParams) -> bool {
    params.query.starts_with("Evaluate the relevance")
}

/// A raw API hit whose text doubles as the oracle marker.
pub fn hit(url: &str, score: f64, text: &str) -> Value {
    json!({
        "title": format!("Page {url}"),
        "url": url,
        "score": score,
        "author": null,
        "publishedDate": "2024-03-01",
        "text": text,
        "highlights": [],
    })
}
