//! Deterministic best-fit packer.
//!
//! Scans the grid in row-major order. At every empty cell it measures the
//! empty rectangle anchored there, scores each remaining instance in each
//! orientation that fits, and commits the best one. Ties keep the first
//! candidate found, which follows instance order and then orientation order.

use crate::geometry::{orientations, Orientation};
use crate::grid::{OccupancyGrid, Space};
use crate::items::{ItemInstance, PlacedItem};
use crate::result::PackingResult;

/// Weights of the candidate score.
///
/// ```text
/// score = area * (item area)
///       + width_match   (if the item spans the pocket's full width)
///       + height_match  (if the item spans the pocket's full height)
///       - waste * (pocket area - item area)
///       + fill * (item width / pocket width + item height / pocket height)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub area: f64,
    pub width_match: f64,
    pub height_match: f64,
    pub waste: f64,
    pub fill: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            area: 1000.0,
            width_match: 5000.0,
            height_match: 3000.0,
            waste: 10.0,
            fill: 1000.0,
        }
    }
}

impl ScoreWeights {
    /// Scores placing `orientation` into a pocket of size `space`.
    pub fn score(&self, orientation: Orientation, space: Space) -> f64 {
        let area = (orientation.width * orientation.height) as f64;
        let pocket = (space.width * space.height) as f64;
        let mut score = area * self.area;
        if orientation.width == space.width {
            score += self.width_match;
        }
        if orientation.height == space.height {
            score += self.height_match;
        }
        score -= (pocket - area) * self.waste;
        score += (orientation.width as f64 / space.width as f64
            + orientation.height as f64 / space.height as f64)
            * self.fill;
        score
    }
}

/// Best candidate at a cell: index into the pool, orientation, score.
struct Candidate {
    index: usize,
    orientation: Orientation,
    score: f64,
}

/// Finds the best scoring instance/orientation to place at `(x, y)`.
fn best_candidate(
    grid: &OccupancyGrid,
    pool: &[ItemInstance],
    x: usize,
    y: usize,
    weights: &ScoreWeights,
) -> Option<Candidate> {
    let space = grid.available_space(x, y);
    if space.width == 0 || space.height == 0 {
        return None;
    }

    let mut best: Option<Candidate> = None;
    for (index, instance) in pool.iter().enumerate() {
        for orientation in orientations(instance.width, instance.height) {
            // available_space is a heuristic bound, so bounds and overlap are
            // checked as well
            if orientation.width > space.width
                || orientation.height > space.height
                || !grid.is_free(x, y, orientation.width, orientation.height)
            {
                continue;
            }

            let score = weights.score(orientation, space);
            if best.as_ref().map_or(true, |current| score > current.score) {
                best = Some(Candidate {
                    index,
                    orientation,
                    score,
                });
            }
        }
    }
    best
}

/// Packs `instances` around the `locked` items with a single row-major scan.
///
/// Fully deterministic: the same input always yields the same result.
pub fn pack_greedy(
    instances: &[ItemInstance],
    width: usize,
    height: usize,
    locked: &[PlacedItem],
    weights: &ScoreWeights,
) -> PackingResult {
    let mut grid = OccupancyGrid::with_items(width, height, locked);
    let mut pool: Vec<ItemInstance> = instances.to_vec();
    let mut placed = Vec::with_capacity(pool.len());

    'scan: for y in 0..height {
        for x in 0..width {
            if pool.is_empty() {
                break 'scan;
            }
            if grid.is_occupied(x, y) {
                continue;
            }

            let Some(candidate) = best_candidate(&grid, &pool, x, y, weights) else {
                continue;
            };

            let instance = pool.remove(candidate.index);
            let item = PlacedItem::from_instance(&instance, x, y, candidate.orientation.rotated);
            log::trace!(
                "greedy: {} at ({}, {}) {}x{} score {:.1}",
                item.id,
                x,
                y,
                item.width,
                item.height,
                candidate.score
            );
            grid.place(&item);
            placed.push(item);
        }
    }

    log::debug!(
        "greedy packed {} of {} instances into {}x{} ({} locked)",
        placed.len(),
        instances.len(),
        width,
        height,
        locked.len()
    );

    let mut all = Vec::with_capacity(locked.len() + placed.len());
    all.extend_from_slice(locked);
    all.extend(placed);
    PackingResult {
        grid,
        placed: all,
        unplaced: pool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::{counts_from, expand_instances};
    use crate::items::Catalog;

    fn catalog() -> Catalog {
        Catalog::from_dimensions(&[
            ("1x1", 1, 1),
            ("2x2", 2, 2),
            ("3x3", 3, 3),
            ("5x2", 5, 2),
            ("2x1", 2, 1),
        ])
    }

    fn run(
        pairs: &[(&str, i64)],
        width: usize,
        height: usize,
        locked: &[PlacedItem],
    ) -> PackingResult {
        let instances = expand_instances(&counts_from(pairs.iter().copied()), &catalog());
        pack_greedy(&instances, width, height, locked, &ScoreWeights::default())
    }

    fn position(result: &PackingResult, id: &str) -> (usize, usize, bool) {
        let item = result
            .placed
            .iter()
            .find(|item| item.id == id)
            .expect("item should be placed");
        (item.x, item.y, item.rotated)
    }

    #[test]
    fn test_single_item_goes_to_origin() {
        let result = run(&[("2x2", 1)], 10, 4, &[]);
        assert_eq!(position(&result, "2x2-0"), (0, 0, false));
        assert!(result.unplaced.is_empty());
    }

    #[test]
    fn test_two_items_share_a_row() {
        let result = run(&[("5x2", 1), ("2x2", 1)], 10, 2, &[]);
        assert_eq!(position(&result, "5x2-0"), (0, 0, false));
        assert_eq!(position(&result, "2x2-0"), (5, 0, false));
        assert!(result.unplaced.is_empty());
    }

    #[test]
    fn test_item_taller_than_grid_is_unplaced() {
        let result = run(&[("3x3", 1)], 10, 2, &[]);
        assert!(result.placed.is_empty());
        assert_eq!(result.unplaced.len(), 1);
        assert_eq!(result.grid.occupied_cells(), 0);
    }

    #[test]
    fn test_locked_item_is_an_obstacle() {
        let locked = PlacedItem {
            id: "L1".into(),
            kind: "2x2".into(),
            x: 0,
            y: 0,
            width: 2,
            height: 2,
            rotated: false,
            is_locked: true,
        };
        let result = run(&[("2x2", 1)], 10, 2, std::slice::from_ref(&locked));
        assert_eq!(result.placed[0], locked);
        assert_eq!(position(&result, "2x2-0"), (2, 0, false));
        assert_eq!(result.grid.get(0, 0), Some("L1"));
    }

    #[test]
    fn test_single_cell_grid() {
        let result = run(&[("1x1", 1)], 1, 1, &[]);
        assert_eq!(position(&result, "1x1-0"), (0, 0, false));
    }

    #[test]
    fn test_rotates_when_only_rotation_fits() {
        // a 2-wide, 5-tall grid only takes the 5x2 case turned on its side
        let result = run(&[("5x2", 1)], 2, 5, &[]);
        let item = &result.placed[0];
        assert!(item.rotated);
        assert_eq!((item.width, item.height), (2, 5));
    }

    #[test]
    fn test_exact_pocket_fit_beats_larger_item() {
        let weights = ScoreWeights::default();
        let pocket = Space { width: 2, height: 1 };
        let exact = Orientation { width: 2, height: 1, rotated: false };
        let narrow = Orientation { width: 1, height: 1, rotated: false };
        assert!(weights.score(exact, pocket) > weights.score(narrow, pocket));
        // 2000 area + 5000 + 3000 - 0 waste + 2000 fill
        assert_eq!(weights.score(exact, pocket), 12000.0);
    }

    #[test]
    fn test_is_deterministic() {
        let pairs = [("5x2", 3), ("2x2", 4), ("1x1", 7), ("2x1", 5), ("3x3", 2)];
        let first = run(&pairs, 10, 6, &[]);
        for _ in 0..5 {
            assert_eq!(run(&pairs, 10, 6, &[]), first);
        }
    }

    #[test]
    fn test_fills_row_layout() {
        let result = run(&[("5x2", 2), ("2x2", 3), ("1x1", 4)], 10, 4, &[]);
        insta::assert_snapshot!(result.render(), @r"
        0000011111
        0000011111
        2233445678
        223344....
        ");
    }
}
