use std::path::PathBuf;

use thiserror::Error;

use crate::items::ItemId;

/// Errors from the fallible edges around the engine: files, JSON, and
/// caller-supplied input checks. Packing itself never fails.
#[derive(Debug, Error)]
pub enum StashError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid count entry {0:?}, expected kind=count")]
    InvalidCount(String),

    #[error("Locked item {id} at ({x}, {y}) does not fit in a {width}x{height} stash")]
    LockedOutOfBounds {
        id: ItemId,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("Locked items {0} and {1} overlap")]
    LockedOverlap(ItemId, ItemId),

    #[error("Layout is {found} cells wide, stash is {expected}")]
    WidthMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, StashError>;
