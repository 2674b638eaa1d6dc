use thiserror::Error;

/// Why a single source tier failed to produce records. Never propagated past
/// the resolver: each kind is logged and the next tier is tried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("required credentials are not configured")]
    ConfigMissing,
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("parse failed: {0}")]
    ParseFailed(String),
    #[error("no records found")]
    NotFound,
}
