//! Item kinds, catalogs, and the instances the packers move around.
//!
//! A kind is a named rectangle measured in stash cells. Kinds are looked up
//! through an explicit [`Catalog`] value so the engine never depends on a
//! hard-coded table.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Identifier of an item kind, e.g. `"items_case"`.
pub type KindId = String;

/// Identifier of a single instance or placed item.
pub type ItemId = String;

/// Width of every stash grid, in cells.
pub const STASH_WIDTH: usize = 10;

/// Default stash height used by the CLI.
pub const DEFAULT_STASH_HEIGHT: usize = 28;

/// A named item shape with fixed dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemKind {
    pub id: KindId,
    pub width: usize,
    pub height: usize,
}

/// Read-only table mapping kind ids to their shapes.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    kinds: FxHashMap<KindId, ItemKind>,
}

impl Catalog {
    /// Builds a catalog from a list of kinds. Later duplicates replace earlier ones.
    pub fn new(kinds: impl IntoIterator<Item = ItemKind>) -> Self {
        Self {
            kinds: kinds
                .into_iter()
                .map(|kind| (kind.id.clone(), kind))
                .collect(),
        }
    }

    /// Builds a catalog from `(id, width, height)` triples.
    pub fn from_dimensions(entries: &[(&str, usize, usize)]) -> Self {
        Self::new(entries.iter().map(|&(id, width, height)| ItemKind {
            id: id.to_string(),
            width,
            height,
        }))
    }

    /// Looks up a kind. Zero-sized kinds are treated as unknown.
    pub fn get(&self, kind: &str) -> Option<&ItemKind> {
        self.kinds
            .get(kind)
            .filter(|entry| entry.width > 0 && entry.height > 0)
    }

    /// Returns true if `kind` names a usable entry of this catalog.
    pub fn is_valid_kind(&self, kind: &str) -> bool {
        self.get(kind).is_some()
    }

    /// All kinds, sorted by id.
    pub fn kinds(&self) -> Vec<&ItemKind> {
        let mut kinds: Vec<&ItemKind> = self.kinds.values().collect();
        kinds.sort_by(|a, b| a.id.cmp(&b.id));
        kinds
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Container cases found in a game stash, as `(id, width, height)`.
pub const STASH_CASES: &[(&str, usize, usize)] = &[
    ("ammo_case", 2, 2),
    ("documents_case", 2, 1),
    ("dogtag_case", 1, 1),
    ("grenade_case", 3, 3),
    ("injector_case", 1, 1),
    ("items_case", 4, 4),
    ("key_tool", 1, 1),
    ("lucky_scav_junk_box", 4, 4),
    ("medicine_case", 3, 3),
    ("sicc_pouch", 2, 2),
    ("thicc_items_case", 5, 5),
    ("thicc_weapon_case", 5, 2),
    ("weapon_case", 5, 2),
];

impl Catalog {
    /// The built-in catalog of stash cases.
    pub fn stash_cases() -> Self {
        Self::from_dimensions(STASH_CASES)
    }
}

/// One concrete unit awaiting placement.
///
/// `width` and `height` are the kind's dimensions before any rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInstance {
    pub id: ItemId,
    pub kind: KindId,
    pub width: usize,
    pub height: usize,
}

/// An item committed to a position in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub id: ItemId,
    pub kind: KindId,
    pub x: usize,
    pub y: usize,
    /// Effective width after rotation.
    pub width: usize,
    /// Effective height after rotation.
    pub height: usize,
    pub rotated: bool,
    #[serde(default)]
    pub is_locked: bool,
}

impl PlacedItem {
    /// Places `instance` at `(x, y)`, swapping its dimensions when `rotated`.
    pub fn from_instance(instance: &ItemInstance, x: usize, y: usize, rotated: bool) -> Self {
        let (width, height) = if rotated {
            (instance.height, instance.width)
        } else {
            (instance.width, instance.height)
        };
        Self {
            id: instance.id.clone(),
            kind: instance.kind.clone(),
            x,
            y,
            width,
            height,
            rotated,
            is_locked: false,
        }
    }

    /// Recovers the unrotated instance this placement came from.
    pub fn to_instance(&self) -> ItemInstance {
        let (width, height) = if self.rotated {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        };
        ItemInstance {
            id: self.id.clone(),
            kind: self.kind.clone(),
            width,
            height,
        }
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }
}
