use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("cannot read icon {path}: {source}")]
    IconRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode icon {path}: {reason}")]
    IconDecode { path: PathBuf, reason: String },
}
