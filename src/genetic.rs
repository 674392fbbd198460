//! Evolutionary packer.
//!
//! Individuals are whole layouts: a set of non-overlapping placements of a
//! subset of the instances, always around the same locked items. The
//! population starts from copies of the greedy layout plus randomly built
//! layouts, and evolves through tournament selection, placement-preserving
//! crossover, and single-item relocation mutations.
//!
//! Runs are not reproducible unless the caller seeds the [`RandomSource`].

use rustc_hash::{FxHashMap, FxHashSet};

use crate::geometry::{bounding_box, orientations, Orientation};
use crate::greedy::{pack_greedy, ScoreWeights};
use crate::grid::OccupancyGrid;
use crate::items::{ItemInstance, PlacedItem};
use crate::random::{shuffle, RandomSource};
use crate::result::PackingResult;

/// Parameters of the evolutionary search.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneticConfig {
    /// Number of layouts per generation.
    pub population_size: usize,
    /// Number of generations to evolve.
    pub generations: u32,
    /// Probability that an offspring is mutated (0.0 - 1.0).
    pub mutation_rate: f64,
    /// Fraction of each generation carried over unchanged (0.0 - 1.0).
    pub elitism: f64,
    /// Individuals drawn per tournament.
    pub tournament_size: usize,
    /// Fraction of the initial population seeded from the greedy layout.
    pub greedy_seed_fraction: f64,
    /// Random positions tried per instance when building a random layout.
    pub placement_attempts: usize,
    /// Random positions tried when relocating a mutated item.
    pub mutation_attempts: usize,
    /// Fitness added per item whose x is a multiple of its width.
    pub alignment_bonus: f64,
    /// Weights for the greedy seed layout.
    pub weights: ScoreWeights,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            mutation_rate: 0.1,
            elitism: 0.2,
            tournament_size: 5,
            greedy_seed_fraction: 0.3,
            placement_attempts: 100,
            mutation_attempts: 50,
            alignment_bonus: 10.0,
            weights: ScoreWeights::default(),
        }
    }
}

impl GeneticConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the population size (at least 2).
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size.max(2);
        self
    }

    pub fn with_generations(mut self, generations: u32) -> Self {
        self.generations = generations;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_elitism(mut self, fraction: f64) -> Self {
        self.elitism = fraction.clamp(0.0, 1.0);
        self
    }

    /// Sets the tournament size (at least 1).
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size.max(1);
        self
    }

    pub fn with_greedy_seed_fraction(mut self, fraction: f64) -> Self {
        self.greedy_seed_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    pub fn with_mutation_attempts(mut self, attempts: usize) -> Self {
        self.mutation_attempts = attempts;
        self
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Number of individuals copied unchanged into the next generation.
    fn elite_count(&self) -> usize {
        ((self.population_size as f64 * self.elitism).ceil() as usize).min(self.population_size)
    }

    /// Number of initial individuals cloned from the greedy layout.
    fn greedy_seed_count(&self) -> usize {
        ((self.population_size as f64 * self.greedy_seed_fraction).round() as usize)
            .min(self.population_size)
    }
}

/// One candidate layout. Locked items live in the grid but not in
/// `placements`.
#[derive(Debug, Clone)]
struct Layout {
    placements: Vec<PlacedItem>,
    grid: OccupancyGrid,
    fitness: f64,
}

/// Everything shared by the individuals of one run.
struct Search<'a> {
    instances: &'a [ItemInstance],
    locked: &'a [PlacedItem],
    width: usize,
    height: usize,
    config: &'a GeneticConfig,
}

impl Search<'_> {
    fn empty_grid(&self) -> OccupancyGrid {
        OccupancyGrid::with_items(self.width, self.height, self.locked)
    }

    /// `placed_ratio * 1000 + compactness * 500 + alignment bonus`.
    ///
    /// Compactness is one minus the share of the grid taken by the bounding
    /// box of every item, locked ones included.
    fn fitness(&self, placements: &[PlacedItem]) -> f64 {
        let placed_ratio = if self.instances.is_empty() {
            1.0
        } else {
            placements.len() as f64 / self.instances.len() as f64
        };

        let grid_area = (self.width * self.height) as f64;
        let compactness = if grid_area == 0.0 {
            0.0
        } else {
            let occupied = bounding_box(self.locked.iter().chain(placements))
                .map_or(0, |rect| rect.area());
            1.0 - occupied as f64 / grid_area
        };

        let aligned = placements
            .iter()
            .filter(|item| item.x % item.width == 0)
            .count();

        placed_ratio * 1000.0 + compactness * 500.0 + aligned as f64 * self.config.alignment_bonus
    }

    fn layout(&self, placements: Vec<PlacedItem>, grid: OccupancyGrid) -> Layout {
        let fitness = self.fitness(&placements);
        Layout {
            placements,
            grid,
            fitness,
        }
    }

    fn greedy_layout(&self) -> Layout {
        let result = pack_greedy(
            self.instances,
            self.width,
            self.height,
            self.locked,
            &self.config.weights,
        );
        let placements: Vec<PlacedItem> = result
            .placed
            .into_iter()
            .skip(self.locked.len())
            .collect();
        self.layout(placements, result.grid)
    }

    /// Tries up to `attempts` uniformly random positions and orientations for
    /// `instance`, returning the first one that is free in `grid`.
    fn random_position(
        &self,
        grid: &OccupancyGrid,
        instance: &ItemInstance,
        attempts: usize,
        rng: &mut dyn RandomSource,
    ) -> Option<PlacedItem> {
        let candidates: Vec<Orientation> = orientations(instance.width, instance.height)
            .filter(|o| o.width <= self.width && o.height <= self.height)
            .collect();
        if candidates.is_empty() {
            return None;
        }

        for _ in 0..attempts {
            let orientation = if candidates.len() == 1 {
                candidates[0]
            } else {
                candidates[rng.next_int(candidates.len())]
            };
            let x = rng.next_int(self.width - orientation.width + 1);
            let y = rng.next_int(self.height - orientation.height + 1);
            if grid.is_free(x, y, orientation.width, orientation.height) {
                return Some(PlacedItem::from_instance(instance, x, y, orientation.rotated));
            }
        }
        None
    }

    /// Places instances in a random order at random free positions.
    fn random_layout(&self, rng: &mut dyn RandomSource) -> Layout {
        let mut order: Vec<&ItemInstance> = self.instances.iter().collect();
        shuffle(rng, &mut order);

        let mut grid = self.empty_grid();
        let mut placements = Vec::with_capacity(order.len());
        for instance in order {
            if let Some(item) =
                self.random_position(&grid, instance, self.config.placement_attempts, rng)
            {
                grid.place(&item);
                placements.push(item);
            }
        }
        self.layout(placements, grid)
    }

    fn initial_population(&self, rng: &mut dyn RandomSource) -> Vec<Layout> {
        let size = self.config.population_size;
        let seeds = self.config.greedy_seed_count();

        let mut population = Vec::with_capacity(size);
        if seeds > 0 {
            let greedy = self.greedy_layout();
            population.extend(std::iter::repeat(greedy).take(seeds));
        }
        while population.len() < size {
            population.push(self.random_layout(rng));
        }
        population
    }

    /// Best of `tournament_size` individuals drawn with replacement.
    fn tournament<'p>(&self, population: &'p [Layout], rng: &mut dyn RandomSource) -> &'p Layout {
        let mut best = &population[rng.next_int(population.len())];
        for _ in 1..self.config.tournament_size {
            let challenger = &population[rng.next_int(population.len())];
            if challenger.fitness > best.fitness {
                best = challenger;
            }
        }
        best
    }

    /// Builds a child by taking each item's placement from either parent.
    ///
    /// Ids are visited in the order they first appear in `a` then `b`. A coin
    /// picks the preferred parent for each id; the placement is kept only if
    /// it does not collide with what the child already holds, otherwise the
    /// item is left out of the child.
    fn crossover(&self, a: &Layout, b: &Layout, rng: &mut dyn RandomSource) -> Layout {
        let from_a: FxHashMap<&str, &PlacedItem> =
            a.placements.iter().map(|item| (item.id.as_str(), item)).collect();
        let from_b: FxHashMap<&str, &PlacedItem> =
            b.placements.iter().map(|item| (item.id.as_str(), item)).collect();

        let mut seen = FxHashSet::default();
        let ids: Vec<&str> = a
            .placements
            .iter()
            .chain(&b.placements)
            .map(|item| item.id.as_str())
            .filter(|id| seen.insert(*id))
            .collect();

        let mut grid = self.empty_grid();
        let mut placements = Vec::with_capacity(ids.len());
        for id in ids {
            let (preferred, fallback) = if rng.chance(0.5) {
                (&from_a, &from_b)
            } else {
                (&from_b, &from_a)
            };
            let Some(&item) = preferred.get(id).or_else(|| fallback.get(id)) else {
                continue;
            };
            if grid.is_free(item.x, item.y, item.width, item.height) {
                grid.place(item);
                placements.push(item.clone());
            }
        }
        self.layout(placements, grid)
    }

    /// Moves one random item to a random free position. If no free position
    /// turns up within the attempt budget the layout is left as it was.
    fn mutate(&self, layout: &mut Layout, rng: &mut dyn RandomSource) {
        if layout.placements.is_empty() {
            return;
        }
        let index = rng.next_int(layout.placements.len());
        let original = layout.placements[index].clone();

        layout.grid.remove(&original);
        let instance = original.to_instance();
        match self.random_position(&layout.grid, &instance, self.config.mutation_attempts, rng) {
            Some(moved) => {
                layout.grid.place(&moved);
                layout.placements[index] = moved;
            }
            None => layout.grid.place(&original),
        }
        layout.fitness = self.fitness(&layout.placements);
    }

    fn next_generation(&self, population: &[Layout], rng: &mut dyn RandomSource) -> Vec<Layout> {
        let size = self.config.population_size;
        let mut next: Vec<Layout> = population
            .iter()
            .take(self.config.elite_count())
            .cloned()
            .collect();

        while next.len() < size {
            let a = self.tournament(population, rng);
            let b = self.tournament(population, rng);
            let mut child = self.crossover(a, b, rng);
            if rng.chance(self.config.mutation_rate) {
                self.mutate(&mut child, rng);
            }
            next.push(child);
        }
        next
    }
}

fn sort_by_fitness(population: &mut [Layout]) {
    population.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
}

/// Packs `instances` around `locked` with an evolutionary search and returns
/// the fittest layout found.
pub fn pack_genetic(
    instances: &[ItemInstance],
    width: usize,
    height: usize,
    locked: &[PlacedItem],
    config: &GeneticConfig,
    rng: &mut dyn RandomSource,
) -> PackingResult {
    let search = Search {
        instances,
        locked,
        width,
        height,
        config,
    };

    let mut population = search.initial_population(rng);
    sort_by_fitness(&mut population);

    for generation in 0..config.generations {
        population = search.next_generation(&population, rng);
        sort_by_fitness(&mut population);
        log::debug!(
            "generation {}: best fitness {:.2}",
            generation,
            population.first().map_or(0.0, |layout| layout.fitness)
        );
    }

    let Some(best) = population.into_iter().next() else {
        return PackingResult::assemble(width, height, locked, Vec::new(), instances.to_vec());
    };

    let placed_ids: FxHashSet<&str> = best
        .placements
        .iter()
        .map(|item| item.id.as_str())
        .collect();
    let unplaced: Vec<ItemInstance> = instances
        .iter()
        .filter(|instance| !placed_ids.contains(instance.id.as_str()))
        .cloned()
        .collect();

    log::debug!(
        "genetic packed {} of {} instances into {}x{} after {} generations (fitness {:.2})",
        best.placements.len(),
        instances.len(),
        width,
        height,
        config.generations,
        best.fitness
    );

    let mut placed = Vec::with_capacity(locked.len() + best.placements.len());
    placed.extend_from_slice(locked);
    placed.extend(best.placements);
    PackingResult {
        grid: best.grid,
        placed,
        unplaced,
    }
}
