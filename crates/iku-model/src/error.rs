use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IkuError {
    #[error("unknown IKU code: {0}")]
    UnknownCode(String),
    #[error("unknown dashboard variant: {0}")]
    UnknownVariant(String),
    #[error("invalid chart config {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IkuError>;
