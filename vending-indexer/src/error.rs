use std::fmt;

/// §7: indexer failures are either retryable (`Transient`) or not
/// (`Permanent`); the vending loop only distinguishes on this axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexerErrorKind {
    Transient,
    Permanent,
}

#[derive(Debug, thiserror::Error)]
pub enum IndexerError {
    #[error("transient indexer error: {0}")]
    Transient(String),
    #[error("permanent indexer error: {0}")]
    Permanent(String),
}

impl IndexerError {
    pub fn kind(&self) -> IndexerErrorKind {
        match self {
            IndexerError::Transient(_) => IndexerErrorKind::Transient,
            IndexerError::Permanent(_) => IndexerErrorKind::Permanent,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind() == IndexerErrorKind::Transient
    }
}

impl From<reqwest::Error> for IndexerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            return IndexerError::Transient(err.to_string());
        }
        match err.status() {
            Some(status) if status.is_server_error() => IndexerError::Transient(err.to_string()),
            Some(status) if status.as_u16() == 429 => IndexerError::Transient(err.to_string()),
            _ => IndexerError::Permanent(err.to_string()),
        }
    }
}

impl fmt::Display for IndexerErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexerErrorKind::Transient => write!(f, "transient"),
            IndexerErrorKind::Permanent => write!(f, "permanent"),
        }
    }
}
