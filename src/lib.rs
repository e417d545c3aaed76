pub mod api;
pub mod config;
pub mod data_models;
pub mod error;
pub mod evaluator;
pub mod exa;
pub mod feedback_store;
pub mod formatter;
pub mod orchestrator;
pub mod ranker;
