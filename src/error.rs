use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while reading grids, patterns and template sources.
#[derive(Debug, Error)]
pub enum LifeError {
    /// A file or directory could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A pattern block has rows of differing length.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A text block has no rows or no columns.
    #[error("text block is empty")]
    EmptyBlock,

    /// A pattern block has no live cells, so it has no bounding box.
    #[error("pattern has no live cells")]
    NoLiveCells,

    /// A template file was readable but its contents were rejected.
    #[error("invalid template {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: Box<LifeError>,
    },
}

impl LifeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
