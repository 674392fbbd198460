//! Layout invariants checked over many seeded random inputs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;

use stash_packer::expand::{counts_from, Counts};
use stash_packer::genetic::GeneticConfig;
use stash_packer::geometry::Rect;
use stash_packer::items::{Catalog, PlacedItem};
use stash_packer::packer::{pack_with, Stash};
use stash_packer::random::RngSource;
use stash_packer::result::PackingResult;
use stash_packer::{pack_with_rng, GeneticPacker, GreedyPacker, Method};

const KINDS: &[(&str, usize, usize)] = &[
    ("1x1", 1, 1),
    ("2x1", 2, 1),
    ("2x2", 2, 2),
    ("3x2", 3, 2),
    ("3x3", 3, 3),
    ("4x4", 4, 4),
    ("5x2", 5, 2),
];

fn catalog() -> Catalog {
    Catalog::from_dimensions(KINDS)
}

fn random_counts(rng: &mut StdRng) -> Counts {
    counts_from(
        KINDS
            .iter()
            .map(|&(kind, _, _)| (kind, rng.gen_range(-1..5_i64))),
    )
}

/// A few non-overlapping items taken from a greedy layout.
fn random_locked(rng: &mut StdRng, stash: Stash) -> Vec<PlacedItem> {
    let seed_layout = pack_with_rng(
        &random_counts(rng),
        &catalog(),
        stash,
        &[],
        Method::Greedy,
        &mut RngSource::seeded(0),
    );
    seed_layout
        .placed
        .into_iter()
        .filter(|_| rng.gen_bool(0.3))
        .enumerate()
        .map(|(n, item)| PlacedItem {
            id: format!("locked-{n}"),
            ..item
        })
        .collect()
}

fn submitted(counts: &Counts) -> usize {
    counts
        .iter()
        .filter(|(kind, _)| catalog().is_valid_kind(kind))
        .map(|(_, &count)| count.max(0) as usize)
        .sum()
}

fn check_invariants(result: &PackingResult, counts: &Counts, locked: &[PlacedItem], stash: Stash) {
    for (i, a) in result.placed.iter().enumerate() {
        assert!(
            a.right() <= stash.width && a.bottom() <= stash.height,
            "{} out of bounds",
            a.id
        );
        for b in &result.placed[i + 1..] {
            assert!(
                !Rect::from(a).intersects(&Rect::from(b)),
                "{} overlaps {}",
                a.id,
                b.id
            );
        }
    }

    let mut ids = FxHashSet::default();
    let placed_ids = result.placed.iter().map(|item| item.id.as_str());
    let unplaced_ids = result.unplaced.iter().map(|instance| instance.id.as_str());
    for id in placed_ids.chain(unplaced_ids) {
        assert!(ids.insert(id), "duplicate id {id}");
    }

    assert_eq!(
        result.newly_placed().count() + result.unplaced.len(),
        submitted(counts)
    );

    let emitted: Vec<&PlacedItem> = result.locked().collect();
    assert_eq!(emitted.len(), locked.len());
    for (out, input) in emitted.iter().zip(locked) {
        assert_eq!(
            (&out.id, out.x, out.y, out.width, out.height, out.rotated),
            (&input.id, input.x, input.y, input.width, input.height, input.rotated)
        );
    }

    let catalog = catalog();
    for item in result.newly_placed() {
        let kind = catalog.get(&item.kind).expect("placed kinds come from the catalog");
        let expected = if item.rotated {
            (kind.height, kind.width)
        } else {
            (kind.width, kind.height)
        };
        assert_eq!((item.width, item.height), expected, "{} has wrong size", item.id);
        if item.rotated {
            assert_ne!(kind.width, kind.height, "square {} marked rotated", item.id);
        }
        for y in item.y..item.bottom() {
            for x in item.x..item.right() {
                assert_eq!(result.grid.get(x, y), Some(item.id.as_str()));
            }
        }
    }

    let covered: usize = result.placed.iter().map(PlacedItem::area).sum();
    assert_eq!(result.grid.occupied_cells(), covered);
}

#[test]
fn greedy_layouts_hold_invariants() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..200 {
        let stash = Stash::new(rng.gen_range(1..12));
        let counts = random_counts(&mut rng);
        let locked = random_locked(&mut rng, stash);
        let result = pack_with(
            &counts,
            &catalog(),
            stash,
            &locked,
            &GreedyPacker::default(),
            &mut RngSource::seeded(0),
        );
        check_invariants(&result, &counts, &locked, stash);
    }
}

#[test]
fn genetic_layouts_hold_invariants() {
    let mut rng = StdRng::seed_from_u64(7);
    let packer = GeneticPacker {
        config: GeneticConfig::default()
            .with_population_size(12)
            .with_generations(8),
    };
    for round in 0..25 {
        let stash = Stash::new(rng.gen_range(1..10));
        let counts = random_counts(&mut rng);
        let locked = random_locked(&mut rng, stash);
        let result = pack_with(
            &counts,
            &catalog(),
            stash,
            &locked,
            &packer,
            &mut RngSource::seeded(round),
        );
        check_invariants(&result, &counts, &locked, stash);
    }
}

#[test]
fn greedy_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..30 {
        let stash = Stash::new(rng.gen_range(2..10));
        let counts = random_counts(&mut rng);
        let locked = random_locked(&mut rng, stash);
        let run = |seed| {
            pack_with_rng(
                &counts,
                &catalog(),
                stash,
                &locked,
                Method::Greedy,
                &mut RngSource::seeded(seed),
            )
        };
        assert_eq!(run(1), run(2));
    }
}

#[test]
fn greedy_repack_of_own_output_is_stable() {
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..50 {
        let stash = Stash::new(rng.gen_range(2..8));
        let counts = random_counts(&mut rng);
        let first = pack_with_rng(
            &counts,
            &catalog(),
            stash,
            &[],
            Method::Greedy,
            &mut RngSource::seeded(0),
        );

        let second = pack_with_rng(
            &first.leftover_counts(),
            &catalog(),
            stash,
            &first.placed,
            Method::Greedy,
            &mut RngSource::seeded(0),
        );

        assert_eq!(second.newly_placed().count(), 0);
        assert_eq!(second.unplaced.len(), first.unplaced.len());
        assert_eq!(second.grid, first.grid);
        assert_eq!(second.placed.len(), first.placed.len());
        check_invariants(&second, &first.leftover_counts(), &first.placed, stash);
    }
}

#[test]
fn repack_with_same_kinds_gets_fresh_ids() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..50 {
        let stash = Stash::new(rng.gen_range(2..8));
        let counts = random_counts(&mut rng);
        let first = pack_with_rng(
            &counts,
            &catalog(),
            stash,
            &[],
            Method::Greedy,
            &mut RngSource::seeded(0),
        );
        for method in [Method::Greedy, Method::Genetic] {
            let second = pack_with_rng(
                &counts,
                &catalog(),
                stash,
                &first.placed,
                method,
                &mut RngSource::seeded(0),
            );
            check_invariants(&second, &counts, &first.placed, stash);
        }
    }
}

#[test]
fn genetic_places_all_unit_items() {
    let result = pack_with_rng(
        &counts_from([("1x1", 10)]),
        &catalog(),
        Stash::new(2),
        &[],
        Method::Genetic,
        &mut RngSource::seeded(11),
    );
    assert_eq!(result.newly_placed().count(), 10);
    assert!(result.unplaced.is_empty());
}

#[test]
fn boundary_cases() {
    let empty = pack_with_rng(
        &counts_from([("2x2", 0)]),
        &catalog(),
        Stash::new(4),
        &[],
        Method::Greedy,
        &mut RngSource::seeded(0),
    );
    assert!(empty.placed.is_empty() && empty.unplaced.is_empty());

    let single = pack_with_rng(
        &counts_from([("1x1", 1)]),
        &catalog(),
        Stash::with_size(1, 1),
        &[],
        Method::Greedy,
        &mut RngSource::seeded(0),
    );
    assert_eq!((single.placed[0].x, single.placed[0].y), (0, 0));
}
