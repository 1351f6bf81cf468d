// Error types for loading and resolving a guest list
//
// Only structural problems are errors. Unknown identifiers and noisy rows are
// normal outcomes and never show up here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    /// Header row is missing one or more required column roles
    #[error("guest list must contain columns for {}", .missing.join(", "))]
    Schema { missing: Vec<&'static str> },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl LookupError {
    pub fn is_schema(&self) -> bool {
        matches!(self, LookupError::Schema { .. })
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
