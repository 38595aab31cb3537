//! CLI command definitions and handlers

mod args;

pub mod export;
pub mod providers;
pub mod stats;
pub mod tree;

pub use args::*;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}
