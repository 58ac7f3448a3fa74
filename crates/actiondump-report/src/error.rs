use actiondump_rpc::RpcError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error("`{method}` returned {found} where a list was expected")]
    UnexpectedShape {
        method: &'static str,
        found: &'static str,
    },
    #[error("raw payload serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV output failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
