//! Single entry point into the engine.
//!
//! Expands counts into ordered instances, pins the caller's locked items, and
//! hands both to the selected packer.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::error::{Result, StashError};
use crate::expand::{expand_instances_avoiding, Counts};
use crate::geometry::Rect;
use crate::grid::fits;
use crate::items::{Catalog, PlacedItem, STASH_WIDTH};
use crate::random::{RandomSource, RngSource};
use crate::result::PackingResult;
use crate::{GeneticPacker, GreedyPacker, Packer};

/// Packing algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Greedy,
    Genetic,
}

impl Method {
    /// Parses a method name. Anything unrecognized selects [`Method::Greedy`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "genetic" | "ga" | "evolutionary" => Method::Genetic,
            _ => Method::Greedy,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Method::Greedy => "greedy",
            Method::Genetic => "genetic",
        }
    }

    /// The packer for this method with default parameters.
    pub fn packer(self) -> Box<dyn Packer> {
        match self {
            Method::Greedy => Box::new(GreedyPacker::default()),
            Method::Genetic => Box::new(GeneticPacker::default()),
        }
    }
}

impl From<&str> for Method {
    fn from(name: &str) -> Self {
        Method::from_name(name)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stash dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stash {
    pub width: usize,
    pub height: usize,
}

impl Stash {
    /// A standard-width stash with `height` rows.
    pub const fn new(height: usize) -> Self {
        Self {
            width: STASH_WIDTH,
            height,
        }
    }

    pub const fn with_size(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub const fn area(&self) -> usize {
        self.width * self.height
    }
}

/// Packs `counts` into `stash` around `locked` using entropy-seeded randomness.
pub fn pack(
    counts: &Counts,
    catalog: &Catalog,
    stash: Stash,
    locked: &[PlacedItem],
    method: Method,
) -> PackingResult {
    pack_with_rng(
        counts,
        catalog,
        stash,
        locked,
        method,
        &mut RngSource::from_entropy(),
    )
}

/// Like [`pack`], drawing randomness from `rng`.
pub fn pack_with_rng(
    counts: &Counts,
    catalog: &Catalog,
    stash: Stash,
    locked: &[PlacedItem],
    method: Method,
    rng: &mut dyn RandomSource,
) -> PackingResult {
    pack_with(counts, catalog, stash, locked, method.packer().as_ref(), rng)
}

/// Packs with an explicitly configured packer.
///
/// Locked items come back first in the placed list, in input order, with
/// the same id, position, dimensions, and rotation. Their `is_locked` flag is
/// always set on output.
pub fn pack_with(
    counts: &Counts,
    catalog: &Catalog,
    stash: Stash,
    locked: &[PlacedItem],
    packer: &dyn Packer,
    rng: &mut dyn RandomSource,
) -> PackingResult {
    let taken: FxHashSet<&str> = locked.iter().map(|item| item.id.as_str()).collect();
    let instances = expand_instances_avoiding(counts, catalog, &taken);
    let pinned: Vec<PlacedItem> = locked
        .iter()
        .map(|item| PlacedItem {
            is_locked: true,
            ..item.clone()
        })
        .collect();

    log::debug!(
        "packing {} instances into {}x{} with {} ({} locked)",
        instances.len(),
        stash.width,
        stash.height,
        packer.name(),
        pinned.len()
    );
    packer.pack(&instances, stash, &pinned, rng)
}

/// Checks that locked items lie inside `stash` and do not overlap each other.
///
/// The packers assume this holds and do not check it themselves.
pub fn validate_locked(locked: &[PlacedItem], stash: Stash) -> Result<()> {
    for (index, item) in locked.iter().enumerate() {
        if item.width == 0
            || item.height == 0
            || !fits(item.x, item.y, item.width, item.height, stash.width, stash.height)
        {
            return Err(StashError::LockedOutOfBounds {
                id: item.id.clone(),
                x: item.x,
                y: item.y,
                width: stash.width,
                height: stash.height,
            });
        }
        let rect = Rect::from(item);
        if let Some(other) = locked[..index]
            .iter()
            .find(|other| Rect::from(*other).intersects(&rect))
        {
            return Err(StashError::LockedOverlap(other.id.clone(), item.id.clone()));
        }
    }
    Ok(())
}
