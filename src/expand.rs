//! Expansion of kind counts into individually addressable instances.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{Result, StashError};
use crate::items::{Catalog, ItemInstance, KindId};

/// Requested number of items per kind. Non-positive counts are ignored.
pub type Counts = FxHashMap<KindId, i64>;

/// Expands `counts` into one [`ItemInstance`] per requested item, in packing
/// priority order (see [`sort_instances`]).
///
/// Kinds missing from `catalog` are skipped with a warning. Instance ids are
/// `"<kind>-<n>"` with `n` counting from zero within each kind.
pub fn expand_instances(counts: &Counts, catalog: &Catalog) -> Vec<ItemInstance> {
    expand_instances_avoiding(counts, catalog, &FxHashSet::default())
}

/// Like [`expand_instances`], skipping every `n` whose id is in `taken`.
///
/// Used to keep new ids distinct from the ids of locked items.
pub fn expand_instances_avoiding(
    counts: &Counts,
    catalog: &Catalog,
    taken: &FxHashSet<&str>,
) -> Vec<ItemInstance> {
    let mut instances = Vec::new();

    for (kind_id, &count) in counts {
        if count <= 0 {
            continue;
        }
        let Some(kind) = catalog.get(kind_id) else {
            log::warn!("skipping unknown item kind {kind_id:?} (count {count})");
            continue;
        };
        let ids = (0..)
            .map(|n: u64| format!("{}-{}", kind.id, n))
            .filter(|id| !taken.contains(id.as_str()));
        instances.extend(ids.take(count as usize).map(|id| ItemInstance {
            id,
            kind: kind.id.clone(),
            width: kind.width,
            height: kind.height,
        }));
    }

    sort_instances(&mut instances);
    instances
}

/// Sorts instances into packing priority order.
///
/// 1. kinds with more than one instance before singletons
/// 2. wider before narrower (unrotated width)
/// 3. taller before shorter
/// 4. kind id ascending
///
/// The sort is stable, so instances of one kind keep their relative order.
pub fn sort_instances(instances: &mut [ItemInstance]) {
    let multiplicity = counts_of(instances.iter());
    let repeated = |kind: &str| multiplicity.get(kind).is_some_and(|&count| count > 1);

    instances.sort_by(|a, b| {
        repeated(b.kind.as_str())
            .cmp(&repeated(a.kind.as_str()))
            .then_with(|| b.width.cmp(&a.width))
            .then_with(|| b.height.cmp(&a.height))
            .then_with(|| a.kind.cmp(&b.kind))
    });
}

/// Regroups instances into per-kind counts.
pub fn counts_of<'a>(instances: impl IntoIterator<Item = &'a ItemInstance>) -> Counts {
    let mut counts = Counts::default();
    for instance in instances {
        *counts.entry(instance.kind.clone()).or_default() += 1;
    }
    counts
}

/// Builds a count map from `(kind, count)` pairs.
pub fn counts_from<K: Into<KindId>>(pairs: impl IntoIterator<Item = (K, i64)>) -> Counts {
    let mut counts = Counts::default();
    for (kind, count) in pairs {
        *counts.entry(kind.into()).or_default() += count;
    }
    counts
}

/// Parses a `kind=count,kind=count` list. A bare `kind` counts as one.
pub fn parse_counts(list: &str) -> Result<Counts> {
    let mut counts = Counts::default();
    for entry in list.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let (kind, count) = match entry.split_once('=') {
            Some((kind, count)) => {
                let count = count
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| StashError::InvalidCount(entry.to_string()))?;
                (kind.trim(), count)
            }
            None => (entry, 1),
        };
        if kind.is_empty() {
            return Err(StashError::InvalidCount(entry.to_string()));
        }
        *counts.entry(kind.to_string()).or_default() += count;
    }
    Ok(counts)
}
