//! Error types for tree building and rendering

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while building or rendering an entry tree.
///
/// Every variant is scoped to a single path: callers processing several roots
/// report the error and move on to the next root.
#[derive(Error, Debug)]
pub enum TreeError {
    /// The path did not exist when it was accessed.
    #[error("cannot access '{}': No such file or directory", .path.display())]
    NotFound { path: PathBuf },

    /// Any other I/O failure (permissions, unreadable directory, ...).
    #[error("cannot access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl TreeError {
    /// Wrap an I/O error raised for `path`, keeping "not found" distinct.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            TreeError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            TreeError::Io {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TreeError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, TreeError>;
