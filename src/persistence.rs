//! JSON files for layouts and catalogs.
//!
//! A saved layout records every placed item of a run so it can be shown
//! again or fed back as locked items:
//!
//! ```json
//! { "width": 10, "height": 28, "items": [ { "id": "L1", "kind": "items_case",
//!   "x": 0, "y": 0, "width": 4, "height": 4, "rotated": false, "is_locked": true } ] }
//! ```
//!
//! A catalog file is a list of `{ "id", "width", "height" }` entries.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StashError};
use crate::items::{Catalog, ItemKind, PlacedItem};
use crate::result::PackingResult;

/// Placed items of a stash, independent of the run that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedLayout {
    pub width: usize,
    pub height: usize,
    pub items: Vec<PlacedItem>,
}

impl From<&PackingResult> for SavedLayout {
    fn from(result: &PackingResult) -> Self {
        Self {
            width: result.grid.width(),
            height: result.grid.height(),
            items: result.placed.clone(),
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| StashError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| StashError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `layout` as pretty-printed JSON.
pub fn save_layout(path: &Path, layout: &SavedLayout) -> Result<()> {
    let json = serde_json::to_string_pretty(layout)?;
    write(path, &json)?;
    log::debug!("saved {} items to {}", layout.items.len(), path.display());
    Ok(())
}

/// Reads a layout written by [`save_layout`].
pub fn load_layout(path: &Path) -> Result<SavedLayout> {
    Ok(serde_json::from_str(&read(path)?)?)
}

/// Reads a catalog from a JSON list of kinds.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let kinds: Vec<ItemKind> = serde_json::from_str(&read(path)?)?;
    Ok(Catalog::new(kinds))
}
