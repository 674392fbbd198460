//! Output of a packing run.

use serde::{Deserialize, Serialize};

use crate::expand::{counts_of, Counts};
use crate::grid::{format_layout, OccupancyGrid};
use crate::items::{ItemInstance, PlacedItem};

/// Grid, placements, and leftovers of a single packing run.
///
/// `placed` lists locked items first, in the order they were supplied,
/// followed by the items the packer committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingResult {
    pub grid: OccupancyGrid,
    pub placed: Vec<PlacedItem>,
    pub unplaced: Vec<ItemInstance>,
}

impl PackingResult {
    /// Builds a result from locked items plus newly placed items, marking
    /// every item into a fresh grid.
    pub fn assemble(
        width: usize,
        height: usize,
        locked: &[PlacedItem],
        placed: Vec<PlacedItem>,
        unplaced: Vec<ItemInstance>,
    ) -> Self {
        let mut all = Vec::with_capacity(locked.len() + placed.len());
        all.extend_from_slice(locked);
        all.extend(placed);
        Self {
            grid: OccupancyGrid::with_items(width, height, &all),
            placed: all,
            unplaced,
        }
    }

    /// Items the packer placed during this run.
    pub fn newly_placed(&self) -> impl Iterator<Item = &PlacedItem> {
        self.placed.iter().filter(|item| !item.is_locked)
    }

    /// Items that were pinned before the run.
    pub fn locked(&self) -> impl Iterator<Item = &PlacedItem> {
        self.placed.iter().filter(|item| item.is_locked)
    }

    /// Unplaced instances regrouped as counts, ready to be packed again.
    pub fn leftover_counts(&self) -> Counts {
        counts_of(&self.unplaced)
    }

    /// Fraction of grid cells covered by an item.
    pub fn fill_ratio(&self) -> f64 {
        let total = self.grid.width() * self.grid.height();
        if total == 0 {
            return 0.0;
        }
        self.grid.occupied_cells() as f64 / total as f64
    }

    /// Text rendering of the layout, see [`format_layout`].
    pub fn render(&self) -> String {
        format_layout(&self.placed, self.grid.width(), self.grid.height())
    }
}
