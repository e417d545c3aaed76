use std::fmt::Write;

use crate::data_models::{Metrics, RankedResult};

/// Render one ranked result as a markdown block.
pub fn format_result(ranked: &RankedResult) -> String {
    let result = &ranked.result;
    let mut out = String::new();

    // writing into a String can't fail
    let _ = writeln!(out, "### [{}]({})", result.title, result.url);
    let _ = writeln!(out, "**Score:** {:.4}", result.score);
    let _ = writeln!(
        out,
        "**AI Score:** {:.4} (retrieval {:.4})",
        ranked.ai_score, ranked.original_score
    );
    if let Some(author) = result.author.as_deref().filter(|a| !a.is_empty()) {
        let _ = writeln!(out, "**Author:** {author}");
    }
    if let Some(published) = result.published_date.as_deref().filter(|p| !p.is_empty()) {
        let _ = writeln!(out, "**Published:** {published}");
    }
    if let Some(text) = result.text.as_deref().filter(|t| !t.is_empty()) {
        let _ = writeln!(out, "\n{text}");
    }
    if !result.highlights.is_empty() {
        let _ = writeln!(out, "\nHighlights:");
        for (idx, highlight) in result.highlights.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", idx + 1, highlight);
        }
    }
    out.push_str("---\n");
    out
}

pub fn format_results(results: &[RankedResult]) -> String {
    if results.is_empty() {
        return "No results found.\n".to_string();
    }
    results.iter().map(format_result).collect::<Vec<_>>().join("\n")
}

pub fn format_metrics(metrics: &Metrics) -> String {
    format!(
        "Positive feedback rate: {:.1}%\nAverage AI score:       {:.4}\nDistinct queries:       {}\n",
        metrics.positive_feedback_rate * 100.0,
        metrics.average_ai_score,
        metrics.total_queries
    )
}
