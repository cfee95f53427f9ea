use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HermitError {
    #[error("path escapes workspace root: {}", .0.display())]
    PathEscape(PathBuf),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("corrupt state: {0}")]
    CorruptState(String),
    #[error("check failed: {0}")]
    CheckFailed(String),
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("not found: {0}")]
    NotFound(String),
}
