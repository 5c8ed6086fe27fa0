pub mod app;
pub mod change_set;
pub mod cli;
pub mod config;
pub mod cost;
pub mod error;
pub mod llm;
pub mod markup;
pub mod plan;
pub mod pricing;
pub mod progress;
pub mod prompts;
