use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("path has no file name: {0}")]
    MissingFileName(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Index(#[from] IndexError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("unit not found in index: {0}")]
    UnknownUnit(String),

    #[error("unit already indexed: {0}")]
    DuplicateUnit(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankError {
    #[error("invalid ranking parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("ingest failed: {0}")]
    Ingest(String),
}

impl From<IngestError> for RankError {
    fn from(error: IngestError) -> Self {
        RankError::Ingest(error.to_string())
    }
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
