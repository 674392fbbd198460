//! Stash Packer Library
//!
//! Packs fixed-size rectangular items into a fixed-width stash grid around
//! pinned items, using either a deterministic best-fit scan or an
//! evolutionary search.

pub mod error;
pub mod expand;
pub mod genetic;
pub mod geometry;
pub mod greedy;
pub mod grid;
pub mod items;
pub mod packer;
pub mod persistence;
pub mod random;
pub mod result;

use genetic::{pack_genetic, GeneticConfig};
use greedy::{pack_greedy, ScoreWeights};
use items::{ItemInstance, PlacedItem};
use packer::Stash;
use random::RandomSource;
use result::PackingResult;

pub use error::StashError;
pub use packer::{pack, pack_with_rng, Method};

/// A packing algorithm behind dynamic dispatch.
///
/// Implementations receive instances already in priority order and locked
/// items already flagged, and must re-emit the locked items first and
/// unchanged.
pub trait Packer {
    fn pack(
        &self,
        instances: &[ItemInstance],
        stash: Stash,
        locked: &[PlacedItem],
        rng: &mut dyn RandomSource,
    ) -> PackingResult;

    fn name(&self) -> &'static str;
}

/// Deterministic best-fit packer; ignores the random source.
#[derive(Debug, Clone, Default)]
pub struct GreedyPacker {
    pub weights: ScoreWeights,
}

/// Evolutionary packer.
#[derive(Debug, Clone, Default)]
pub struct GeneticPacker {
    pub config: GeneticConfig,
}

impl Packer for GreedyPacker {
    fn pack(
        &self,
        instances: &[ItemInstance],
        stash: Stash,
        locked: &[PlacedItem],
        _rng: &mut dyn RandomSource,
    ) -> PackingResult {
        pack_greedy(instances, stash.width, stash.height, locked, &self.weights)
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}

impl Packer for GeneticPacker {
    fn pack(
        &self,
        instances: &[ItemInstance],
        stash: Stash,
        locked: &[PlacedItem],
        rng: &mut dyn RandomSource,
    ) -> PackingResult {
        pack_genetic(
            instances,
            stash.width,
            stash.height,
            locked,
            &self.config,
            rng,
        )
    }

    fn name(&self) -> &'static str {
        "genetic"
    }
}
