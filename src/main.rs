//! Stash Packer
//!
//! Packs game stash cases into a 10-wide stash grid, keeping any pinned
//! cases where they are, and prints the resulting layout.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use stash_packer::expand::{parse_counts, Counts};
use stash_packer::items::{Catalog, PlacedItem, DEFAULT_STASH_HEIGHT, STASH_WIDTH};
use stash_packer::packer::{pack_with_rng, validate_locked, Stash};
use stash_packer::persistence::{load_catalog, load_layout, save_layout, SavedLayout};
use stash_packer::random::RngSource;
use stash_packer::result::PackingResult;
use stash_packer::{grid, Method, StashError};

/// Packs stash cases into a fixed-width grid.
#[derive(Parser)]
#[command(name = "stash-packer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pack cases and print the layout.
    Pack {
        /// Cases to pack, as kind=count pairs separated by commas.
        #[arg(short, long)]
        counts: String,
        /// Stash height in rows.
        #[arg(long, default_value_t = DEFAULT_STASH_HEIGHT)]
        height: usize,
        /// Packing method: greedy or genetic. Unknown names use greedy.
        #[arg(short, long, default_value = "greedy")]
        method: String,
        /// Seed for the genetic packer.
        #[arg(long)]
        seed: Option<u64>,
        /// Layout file whose items stay in place.
        #[arg(long)]
        locked: Option<PathBuf>,
        /// Catalog file replacing the built-in case list.
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Write the resulting layout to this file.
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// List known case kinds and their sizes.
    Catalog {
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Print a saved layout.
    Show { path: PathBuf },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Pack {
            counts,
            height,
            method,
            seed,
            locked,
            catalog,
            save,
        } => run_pack(PackArgs {
            counts: &counts,
            height,
            method: Method::from_name(&method),
            seed,
            locked: locked.as_deref(),
            catalog: catalog.as_deref(),
            save: save.as_deref(),
        }),
        Command::Catalog { catalog } => run_catalog(catalog.as_deref()),
        Command::Show { path } => run_show(&path),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

struct PackArgs<'a> {
    counts: &'a str,
    height: usize,
    method: Method,
    seed: Option<u64>,
    locked: Option<&'a Path>,
    catalog: Option<&'a Path>,
    save: Option<&'a Path>,
}

fn catalog_from(path: Option<&Path>) -> Result<Catalog, StashError> {
    match path {
        Some(path) => load_catalog(path),
        None => Ok(Catalog::stash_cases()),
    }
}

/// Loads locked items, checking they belong to a stash of this size.
fn locked_from(path: Option<&Path>, stash: Stash) -> Result<Vec<PlacedItem>, StashError> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let layout = load_layout(path)?;
    if layout.width != stash.width {
        return Err(StashError::WidthMismatch {
            expected: stash.width,
            found: layout.width,
        });
    }
    validate_locked(&layout.items, stash)?;
    Ok(layout.items)
}

/// Packs, prints, and optionally saves a layout.
fn run_pack(args: PackArgs<'_>) -> Result<(), StashError> {
    let catalog = catalog_from(args.catalog)?;
    let counts: Counts = parse_counts(args.counts)?;
    let stash = Stash::new(args.height);
    let locked = locked_from(args.locked, stash)?;

    let mut rng = match args.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };
    let result = pack_with_rng(&counts, &catalog, stash, &locked, args.method, &mut rng);

    print!("{}", describe(&result));

    if let Some(path) = args.save {
        save_layout(path, &SavedLayout::from(&result))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Renders a result: the grid, a legend, and leftovers.
fn describe(result: &PackingResult) -> String {
    let mut output = result.render();
    output.push('\n');
    for (index, item) in result.placed.iter().enumerate() {
        output.push_str(&format!(
            "{:>3} {:<22} ({}, {}) {}x{}{}{}\n",
            index,
            item.id,
            item.x,
            item.y,
            item.width,
            item.height,
            if item.rotated { " rotated" } else { "" },
            if item.is_locked { " locked" } else { "" },
        ));
    }
    output.push_str(&format!(
        "Placed {} ({} locked), filled {:.0}%\n",
        result.placed.len(),
        result.locked().count(),
        result.fill_ratio() * 100.0
    ));
    if !result.unplaced.is_empty() {
        let mut leftovers: Vec<(String, i64)> = result.leftover_counts().into_iter().collect();
        leftovers.sort();
        let listed: Vec<String> = leftovers
            .iter()
            .map(|(kind, count)| format!("{kind}={count}"))
            .collect();
        output.push_str(&format!("Did not fit: {}\n", listed.join(",")));
    }
    output
}

fn run_catalog(path: Option<&Path>) -> Result<(), StashError> {
    let catalog = catalog_from(path)?;
    for kind in catalog.kinds() {
        println!("{:<22} {}x{}", kind.id, kind.width, kind.height);
    }
    Ok(())
}

fn run_show(path: &Path) -> Result<(), StashError> {
    let layout = load_layout(path)?;
    if layout.width != STASH_WIDTH {
        log::warn!("layout is {} cells wide, expected {}", layout.width, STASH_WIDTH);
    }
    print!("{}", grid::format_layout(&layout.items, layout.width, layout.height));
    println!("{} items", layout.items.len());
    Ok(())
}
