use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use sieve::api::{AppState, create_router};
use sieve::config::Config;
use sieve::data_models::{Category, Feedback, RankedResult, SearchResult};
use sieve::exa::ExaClient;
use sieve::feedback_store::FeedbackStore;
use sieve::formatter;
use sieve::orchestrator::{AdvancedOptions, SearchOrchestrator};

/// Neural search with AI re-ranking and a local feedback log
#[derive(Parser, Debug)]
#[command(name = "sieve", version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the JSON API and the static UI
    Serve,
    /// Plain neural search
    Search {
        query: String,
        #[arg(short, long, default_value_t = 25)]
        num_results: usize,
        #[arg(long)]
        json: bool,
    },
    /// Neural search with content retrieval and an optional category filter
    Advanced {
        query: String,
        #[arg(short, long, default_value_t = 50)]
        num_results: usize,
        /// Skip full page text
        #[arg(long)]
        no_text: bool,
        /// Skip highlights
        #[arg(long)]
        no_highlights: bool,
        /// e.g. "research paper", news, github
        #[arg(short, long)]
        category: Option<Category>,
        #[arg(long)]
        json: bool,
    },
    /// Documents similar to a URL
    Similar {
        url: String,
        #[arg(short, long, default_value_t = 25)]
        num_results: usize,
        /// Keep results from the source URL's own domain
        #[arg(long)]
        include_source_domain: bool,
        #[arg(long)]
        json: bool,
    },
    /// Record feedback for a result
    Feedback {
        #[arg(short, long)]
        query: String,
        /// The `result` object of a `--json` search entry
        #[arg(short, long)]
        result: String,
        /// Thumbs Up, Neutral or Thumbs Down
        #[arg(short, long)]
        feedback: Feedback,
        #[arg(short, long)]
        ai_score: Option<f64>,
    },
    /// Aggregate feedback metrics
    Metrics,
    /// Print the full feedback log
    History,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::Search {
            query,
            num_results,
            json,
        } => {
            let orchestrator = orchestrator(&config)?;
            let results = orchestrator.basic_search(&query, num_results).await?;
            print_results(&results, json)?;
        }
        Commands::Advanced {
            query,
            num_results,
            no_text,
            no_highlights,
            category,
            json,
        } => {
            let orchestrator = orchestrator(&config)?;
            let options = AdvancedOptions {
                num_results,
                include_text: !no_text,
                include_highlights: !no_highlights,
                category,
            };
            let results = orchestrator.advanced_search(&query, &options).await?;
            print_results(&results, json)?;
        }
        Commands::Similar {
            url,
            num_results,
            include_source_domain,
            json,
        } => {
            let orchestrator = orchestrator(&config)?;
            let results = orchestrator
                .find_similar_documents(&url, num_results, !include_source_domain)
                .await?;
            print_results(&results, json)?;
        }
        Commands::Feedback {
            query,
            result,
            feedback,
            ai_score,
        } => {
            let result: SearchResult =
                serde_json::from_str(&result).context("--result must be a search result JSON object")?;
            let store = FeedbackStore::new(&config.feedback_log_path);
            if store.add_feedback(&query, &result, feedback, ai_score) {
                println!("Feedback recorded.");
            } else {
                anyhow::bail!("Failed to record feedback, see log for details");
            }
        }
        Commands::Metrics => {
            let store = FeedbackStore::new(&config.feedback_log_path);
            print!("{}", formatter::format_metrics(&store.get_metrics()));
        }
        Commands::History => {
            let store = FeedbackStore::new(&config.feedback_log_path);
            println!("{}", serde_json::to_string_pretty(&store.get_feedback_history())?);
        }
    }
    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    let state = Arc::new(AppState {
        orchestrator: orchestrator(&config)?,
        feedback: FeedbackStore::new(&config.feedback_log_path),
    });
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    log::info!("Listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Only the search commands need a usable API key; feedback commands run without one.
fn orchestrator(config: &Config) -> Result<SearchOrchestrator<ExaClient>> {
    config.validate().context("Invalid search configuration")?;
    Ok(SearchOrchestrator::from_config(config)?)
}

fn print_results(results: &[RankedResult], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print!("{}", formatter::format_results(results));
    }
    Ok(())
}
