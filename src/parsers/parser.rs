use csv::Error as CsvError;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The protocol reference parsed as JSON but holds an unusable entry.
    #[error("invalid protocol map entry {key:?}: {reason}")]
    InvalidProtocolMap { key: String, reason: String },

    /// A lookup table row that cannot be used. Never fatal.
    #[error("row {row}: {reason}")]
    InvalidRow { row: u64, reason: String },

    /// A single flow log line that cannot be counted. Never fatal.
    #[error("line {line_number}: {reason}")]
    MalformedLine { line_number: u64, reason: String },
}

impl ReadError {
    /// Returns true for errors that only affect one input line.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ReadError::InvalidRow { .. } | ReadError::MalformedLine { .. }
        )
    }
}

/// A source of typed records read from a file on disk.
pub trait Parser {
    type Record;

    fn parse(
        &self,
        file_path: &Path,
    ) -> Result<Box<dyn Iterator<Item = Result<Self::Record, ReadError>>>, ReadError>;
}
