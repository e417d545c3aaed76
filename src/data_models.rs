use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_TITLE: &str = "No Title";
pub const DEFAULT_URL: &str = "#";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub score: f64,
    pub author: Option<String>,
    #[serde(rename = "publishedDate")]
    pub published_date: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

impl SearchResult {
    /// Build a result from one raw hit of the search API.
    ///
    /// Missing or null `title`/`url`/`score` fall back to their defaults; missing
    /// optional fields stay `None`. Non-string highlights are dropped.
    pub fn from_raw(raw: &Value) -> SearchResult {
        let str_field = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_string);

        let highlights = raw
            .get("highlights")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        SearchResult {
            title: str_field("title").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            url: str_field("url").unwrap_or_else(|| DEFAULT_URL.to_string()),
            score: raw.get("score").and_then(Value::as_f64).unwrap_or(0.0),
            author: str_field("author"),
            // the API has used both spellings
            published_date: str_field("publishedDate").or_else(|| str_field("published_date")),
            text: str_field("text"),
            highlights,
        }
    }
}

/// A result after re-ranking. `result.score` holds the blended score.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RankedResult {
    pub result: SearchResult,
    pub ai_score: f64,
    pub original_score: f64,
}

impl RankedResult {
    pub fn score(&self) -> f64 {
        self.result.score
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feedback {
    #[serde(rename = "Thumbs Up")]
    ThumbsUp,
    #[serde(rename = "Neutral")]
    Neutral,
    #[serde(rename = "Thumbs Down")]
    ThumbsDown,
}

impl Feedback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feedback::ThumbsUp => "Thumbs Up",
            Feedback::Neutral => "Neutral",
            Feedback::ThumbsDown => "Thumbs Down",
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feedback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "thumbs up" | "up" => Ok(Feedback::ThumbsUp),
            "neutral" => Ok(Feedback::Neutral),
            "thumbs down" | "down" => Ok(Feedback::ThumbsDown),
            _ => Err(format!(
                "unknown feedback '{s}', expected one of: Thumbs Up, Neutral, Thumbs Down"
            )),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeedbackEntry {
    pub timestamp: String,
    pub query: String,
    pub result: SearchResult,
    pub user_feedback: Feedback,
    pub ai_score: Option<f64>,
}

impl FeedbackEntry {
    pub fn new(
        query: String,
        result: SearchResult,
        user_feedback: Feedback,
        ai_score: Option<f64>,
    ) -> FeedbackEntry {
        FeedbackEntry {
            timestamp: chrono::Local::now()
                .naive_local()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            query,
            result,
            user_feedback,
            ai_score,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Metrics {
    pub positive_feedback_rate: f64,
    pub average_ai_score: f64,
    pub total_queries: usize,
}

impl Metrics {
    pub fn from_entries(entries: &[FeedbackEntry]) -> Metrics {
        if entries.is_empty() {
            return Metrics::default();
        }

        let positive = entries
            .iter()
            .filter(|e| e.user_feedback == Feedback::ThumbsUp)
            .count();

        let ai_scores: Vec<f64> = entries.iter().filter_map(|e| e.ai_score).collect();
        let average_ai_score = if ai_scores.is_empty() {
            0.0
        } else {
            ai_scores.iter().sum::<f64>() / ai_scores.len() as f64
        };

        let total_queries = entries
            .iter()
            .map(|e| e.query.as_str())
            .collect::<HashSet<_>>()
            .len();

        Metrics {
            positive_feedback_rate: positive as f64 / entries.len() as f64,
            average_ai_score,
            total_queries,
        }
    }
}

/// Content categories the search API can filter on.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Company,
    #[serde(rename = "research paper")]
    ResearchPaper,
    News,
    #[serde(rename = "linkedin profile")]
    LinkedinProfile,
    Github,
    Tweet,
    Movie,
    Song,
    #[serde(rename = "personal site")]
    PersonalSite,
    Pdf,
    #[serde(rename = "financial report")]
    FinancialReport,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Company,
            Category::ResearchPaper,
            Category::News,
            Category::LinkedinProfile,
            Category::Github,
            Category::Tweet,
            Category::Movie,
            Category::Song,
            Category::PersonalSite,
            Category::Pdf,
            Category::FinancialReport,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Company => "company",
            Category::ResearchPaper => "research paper",
            Category::News => "news",
            Category::LinkedinProfile => "linkedin profile",
            Category::Github => "github",
            Category::Tweet => "tweet",
            Category::Movie => "movie",
            Category::Song => "song",
            Category::PersonalSite => "personal site",
            Category::Pdf => "pdf",
            Category::FinancialReport => "financial report",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Category::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Category::all().iter().map(Category::as_str).collect();
                format!("unknown category '{s}', expected one of: {}", names.join(", "))
            })
    }
}

// "Research-Paper", "research_paper" and "research paper" all compare equal
fn normalize_label(s: &str) -> String {
    s.trim().to_lowercase().replace(['-', '_'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_raw_applies_defaults() {
        let result = SearchResult::from_raw(&json!({}));
        assert_eq!(result.title, DEFAULT_TITLE);
        assert_eq!(result.url, DEFAULT_URL);
        assert_eq!(result.score, 0.0);
        assert!(result.author.is_none());
        assert!(result.published_date.is_none());
        assert!(result.text.is_none());
        assert!(result.highlights.is_empty());
    }

    #[test]
    fn from_raw_treats_null_as_unset() {
        let result = SearchResult::from_raw(&json!({
            "title": null,
            "url": "https://example.com",
            "score": 0.42,
            "author": null,
            "highlights": null,
        }));
        assert_eq!(result.title, DEFAULT_TITLE);
        assert_eq!(result.url, "https://example.com");
        assert!((result.score - 0.42).abs() < f64::EPSILON);
        assert!(result.author.is_none());
        assert!(result.highlights.is_empty());
    }

    #[test]
    fn from_raw_reads_all_fields() {
        let result = SearchResult::from_raw(&json!({
            "title": "Rust",
            "url": "https://rust-lang.org",
            "score": 0.9,
            "author": "Ferris",
            "publishedDate": "2024-01-01",
            "text": "A language",
            "highlights": ["fast", 3, "safe"],
        }));
        assert_eq!(result.title, "Rust");
        assert_eq!(result.author.as_deref(), Some("Ferris"));
        assert_eq!(result.published_date.as_deref(), Some("2024-01-01"));
        assert_eq!(result.text.as_deref(), Some("A language"));
        assert_eq!(result.highlights, vec!["fast", "safe"]);
    }

    #[test]
    fn search_result_serializes_published_date_camel_case() {
        let result = SearchResult::from_raw(&json!({"publishedDate": "2023-05-05"}));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["publishedDate"], "2023-05-05");
        assert!(value.get("published_date").is_none());
        assert!(value["author"].is_null());
    }

    #[test]
    fn feedback_serializes_as_display_labels() {
        assert_eq!(serde_json::to_value(Feedback::ThumbsUp).unwrap(), "Thumbs Up");
        assert_eq!(serde_json::to_value(Feedback::Neutral).unwrap(), "Neutral");
        assert_eq!(serde_json::to_value(Feedback::ThumbsDown).unwrap(), "Thumbs Down");
    }

    #[test]
    fn feedback_parses_loose_spellings() {
        assert_eq!("thumbs-up".parse::<Feedback>().unwrap(), Feedback::ThumbsUp);
        assert_eq!("Thumbs Down".parse::<Feedback>().unwrap(), Feedback::ThumbsDown);
        assert_eq!("neutral".parse::<Feedback>().unwrap(), Feedback::Neutral);
        assert!("meh".parse::<Feedback>().is_err());
    }

    #[test]
    fn category_round_trips_through_strings() {
        for category in Category::all() {
            let value = serde_json::to_value(category).unwrap();
            assert_eq!(value, category.as_str());
            assert_eq!(category.as_str().parse::<Category>().unwrap(), *category);
        }
        assert_eq!(Category::all().len(), 11);
        assert_eq!(
            "research-paper".parse::<Category>().unwrap(),
            Category::ResearchPaper
        );
        assert!("podcast".parse::<Category>().is_err());
    }

    fn entry(query: &str, feedback: Feedback, ai_score: Option<f64>) -> FeedbackEntry {
        FeedbackEntry::new(
            query.to_string(),
            SearchResult::from_raw(&json!({})),
            feedback,
            ai_score,
        )
    }

    #[test]
    fn metrics_on_empty_log_are_zero() {
        let metrics = Metrics::from_entries(&[]);
        assert_eq!(metrics, Metrics::default());
        assert_eq!(metrics.total_queries, 0);
    }

    #[test]
    fn metrics_aggregate_feedback() {
        let entries = vec![
            entry("q1", Feedback::ThumbsUp, Some(0.9)),
            entry("q1", Feedback::ThumbsDown, Some(0.3)),
            entry("q2", Feedback::ThumbsUp, None),
        ];
        let metrics = Metrics::from_entries(&entries);
        assert!((metrics.positive_feedback_rate - 2.0 / 3.0).abs() < 1e-9);
        assert!((metrics.average_ai_score - 0.6).abs() < 1e-9);
        assert_eq!(metrics.total_queries, 2);
    }

    #[test]
    fn metrics_without_ai_scores_average_zero() {
        let entries = vec![entry("q", Feedback::Neutral, None)];
        let metrics = Metrics::from_entries(&entries);
        assert_eq!(metrics.average_ai_score, 0.0);
        assert_eq!(metrics.positive_feedback_rate, 0.0);
        assert_eq!(metrics.total_queries, 1);
    }

    #[test]
    fn timestamp_is_iso_8601() {
        let e = entry("q", Feedback::Neutral, None);
        assert!(chrono::NaiveDateTime::parse_from_str(&e.timestamp, "%Y-%m-%dT%H:%M:%S%.f").is_ok());
    }
}
