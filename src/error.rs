// File: src/error.rs
use std::path::PathBuf;

/// A malformed resource or record. Rule-table errors abort the load;
/// word-list and dictionary errors are isolated to their record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("rule table line {line}: expected 2 columns, found {found}")]
    RuleColumns { line: u64, found: usize },
    #[error("rule table line {line}: empty pattern")]
    EmptyPattern { line: u64 },
    #[error("dictionary line {line}: {reason}")]
    DictionaryLine { line: u64, reason: String },
    #[error("unknown ARPAbet symbol '{0}'")]
    UnknownArpabet(String),
    #[error("CSV record {record}: {message}")]
    Record { record: u64, message: String },
    #[error("missing required column '{0}'")]
    MissingColumn(String),
}

/// No pronunciation could be produced for a word.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("no pronunciation found for '{0}'")]
    NotFound(String),
    /// The collaborator could not be started or reached at all.
    #[error("{source_name} is unavailable: {message}")]
    Unavailable { source_name: String, message: String },
    #[error("{source_name} failed for '{word}': {message}")]
    Failed {
        source_name: String,
        word: String,
        message: String,
    },
}

/// Errors that abort a whole run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("input not found: {}", .0.display())]
    MissingInput(PathBuf),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),
}

impl PipelineError {
    /// Maps a "file not found" I/O error on `path` to `MissingInput`.
    pub fn from_open(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            PipelineError::MissingInput(path.to_path_buf())
        } else {
            PipelineError::Io(err)
        }
    }
}
