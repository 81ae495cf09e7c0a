use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}:{line}: invalid {field} {value:?}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("{}:{line}: {source}", path.display())]
    Record {
        path: PathBuf,
        line: usize,
        #[source]
        source: cinematch_core::Error,
    },
}

impl IngestError {
    /// 1-based line the error points at, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            IngestError::Io { .. } => None,
            IngestError::Csv { source, .. } => source.position().map(|pos| pos.line() as usize),
            IngestError::Parse { line, .. } | IngestError::Record { line, .. } => Some(*line),
        }
    }
}
