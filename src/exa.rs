use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::data_models::Category;
use crate::error::{Result, SearchError};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Neural,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ContentOptions {
    pub text: bool,
    pub highlights: bool,
}

/// Body of a `/search` request.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: String,
    #[serde(rename = "type")]
    pub search_type: SearchType,
    pub use_autoprompt: bool,
    pub num_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<ContentOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl SearchParams {
    /// Plain neural query with autoprompt and no content retrieval.
    pub fn neural(query: impl Into<String>, num_results: usize) -> Self {
        SearchParams {
            query: query.into(),
            search_type: SearchType::Neural,
            use_autoprompt: true,
            num_results,
            contents: None,
            category: None,
        }
    }
}

/// Body of a `/findSimilar` request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SimilarParams {
    pub url: String,
    pub num_results: usize,
    pub exclude_source_domain: bool,
}

/// The remote search API. Hits come back untyped and are parsed by the caller.
pub trait SearchBackend: Send + Sync {
    fn search(&self, params: &SearchParams) -> impl Future<Output = Result<Vec<Value>>> + Send;

    fn find_similar(
        &self,
        params: &SimilarParams,
    ) -> impl Future<Output = Result<Vec<Value>>> + Send;
}

/// HTTP client for the Exa search API.
#[derive(Debug, Clone)]
pub struct ExaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ExaClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.exa_base_url.trim_end_matches('/').to_string(),
            api_key: config.exa_api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Vec<Value>> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("POST {url}");

        let res = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let message = res.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: message.trim().to_string(),
            });
        }

        let body: Value = res
            .json()
            .await
            .map_err(|e| SearchError::Parse(format!("invalid JSON response: {e}")))?;
        extract_results(body)
    }
}

impl SearchBackend for ExaClient {
    async fn search(&self, params: &SearchParams) -> Result<Vec<Value>> {
        self.post("/search", params).await
    }

    async fn find_similar(&self, params: &SimilarParams) -> Result<Vec<Value>> {
        self.post("/findSimilar", params).await
    }
}

/// Pull the `results` array out of a response body. Null or absent means no hits.
pub fn extract_results(body: Value) -> Result<Vec<Value>> {
    match body {
        Value::Object(mut map) => match map.remove("results") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(results)) => Ok(results),
            Some(other) => Err(SearchError::Parse(format!(
                "expected `results` to be an array, got {other}"
            ))),
        },
        other => Err(SearchError::Parse(format!(
            "expected a JSON object response, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn neural_params_serialize_to_api_body() {
        let params = SearchParams::neural("rust async", 5);
        let body = serde_json::to_value(&params).unwrap();
        assert_eq!(
            body,
            json!({
                "query": "rust async",
                "type": "neural",
                "useAutoprompt": true,
                "numResults": 5,
            })
        );
    }

    #[test]
    fn content_and_category_are_included_when_set() {
        let params = SearchParams {
            contents: Some(ContentOptions {
                text: true,
                highlights: false,
            }),
            category: Some(Category::ResearchPaper),
            ..SearchParams::neural("transformers", 10)
        };
        let body = serde_json::to_value(&params).unwrap();
        assert_eq!(body["contents"], json!({"text": true, "highlights": false}));
        assert_eq!(body["category"], "research paper");
    }

    #[test]
    fn similar_params_serialize_to_api_body() {
        let params = SimilarParams {
            url: "https://example.com".into(),
            num_results: 3,
            exclude_source_domain: true,
        };
        let body = serde_json::to_value(&params).unwrap();
        assert_eq!(
            body,
            json!({
                "url": "https://example.com",
                "numResults": 3,
                "excludeSourceDomain": true,
            })
        );
    }

    #[test]
    fn extract_results_handles_missing_and_null() {
        assert!(extract_results(json!({})).unwrap().is_empty());
        assert!(extract_results(json!({"results": null})).unwrap().is_empty());
        let hits = extract_results(json!({"results": [{"url": "a"}, {"url": "b"}]})).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn extract_results_rejects_bad_shapes() {
        assert!(matches!(
            extract_results(json!({"results": "nope"})),
            Err(SearchError::Parse(_))
        ));
        assert!(matches!(
            extract_results(json!([1, 2])),
            Err(SearchError::Parse(_))
        ));
    }

    #[test]
    fn client_trims_trailing_slash() {
        let config = Config {
            exa_base_url: "http://localhost:9999/".into(),
            ..Config::with_api_key("k")
        };
        let client = ExaClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999");
    }
}
