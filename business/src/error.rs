use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure of a [`KeyValueStore`](crate::KeyValueStore) operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("store file {path} is not a JSON object: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode store contents: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure reading or writing the persisted session record.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("stored session is unreadable: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to encode session: {0}")]
    Encode(#[source] serde_json::Error),
}
