//! # Brewlog CLI
//!
//! Recipe reports and batch tracking from JSON documents.
//!
//! ```bash
//! # Expected values of a recipe, in the brewery's display units
//! brew_cli recipe pale_ale.json --settings settings.json
//!
//! # Create a brewery file and register a batch in it
//! brew_cli brewery init cellar.brew --name "Garage Brewing"
//! brew_cli brewery register cellar.brew batch.json
//!
//! # Move a batch to its next stage
//! brew_cli brewery advance cellar.brew 6f1c...
//!
//! # Equation reference
//! brew_cli equations
//! ```

mod logging;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use uuid::Uuid;

use brew_core::calculations::{calculate, Batch, BatchReport, Comparison, RecipeReport};
use brew_core::equations::generate_equations_markdown;
use brew_core::file_io::{load_brewery, save_brewery, FileLock};
use brew_core::{BrewSettings, Brewery, Recipe};

#[derive(Parser)]
#[command(
    name = "brew_cli",
    about = "Beer recipe calculator and batch tracker",
    long_about = "Computes expected recipe values and tracks batches through the brew day."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Print JSON only
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the expected values of a recipe
    Recipe {
        /// Recipe JSON file
        path: PathBuf,

        /// Settings JSON file (display units)
        #[arg(long)]
        settings: Option<PathBuf>,
    },

    /// Show the status of a batch JSON file
    Batch {
        /// Batch JSON file
        path: PathBuf,
    },

    /// Brewery file management
    Brewery {
        #[command(subcommand)]
        action: BreweryCommand,
    },

    /// Print the equation reference as markdown
    Equations,
}

#[derive(Subcommand)]
enum BreweryCommand {
    /// Create an empty brewery file
    Init {
        path: PathBuf,

        #[arg(long)]
        name: String,
    },

    /// Register a batch JSON file, assigning its batch number
    Register {
        path: PathBuf,
        batch: PathBuf,

        /// Lock holder name
        #[arg(long, default_value = "brew_cli")]
        holder: String,
    },

    /// Move a batch to its next stage
    Advance {
        path: PathBuf,
        batch_id: Uuid,

        #[arg(long, default_value = "brew_cli")]
        holder: String,
    },

    /// Move a batch back one stage
    Retreat {
        path: PathBuf,
        batch_id: Uuid,

        #[arg(long, default_value = "brew_cli")]
        holder: String,
    },

    /// Mark a batch finished
    Finish {
        path: PathBuf,
        batch_id: Uuid,

        #[arg(long, default_value = "brew_cli")]
        holder: String,
    },

    /// List the batches of one owner
    List {
        path: PathBuf,

        #[arg(long)]
        owner: Uuid,
    },
}

#[derive(Clone, Copy)]
enum Transition {
    Advance,
    Retreat,
    Finish,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Recipe { path, settings } => run_recipe(&path, settings.as_deref(), cli.json),
        Command::Batch { path } => run_batch(&path, cli.json),
        Command::Brewery { action } => run_brewery(action, cli.json),
        Command::Equations => {
            println!("{}", generate_equations_markdown());
            Ok(())
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// Recipe
// ============================================================================

fn run_recipe(path: &Path, settings_path: Option<&Path>, json_only: bool) -> Result<()> {
    let recipe: Recipe = read_json(path)?;
    let settings = match settings_path {
        Some(p) => {
            let contents = fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            BrewSettings::from_json(&contents)?
        }
        None => BrewSettings::default(),
    };

    let report = calculate(&recipe)?;
    if !json_only {
        print_recipe_summary(&report, &settings)?;
    }
    print_json(&report)
}

fn print_recipe_summary(report: &RecipeReport, settings: &BrewSettings) -> Result<()> {
    println!("═══════════════════════════════════════");
    println!("  {}", report.name);
    println!("═══════════════════════════════════════");
    println!("Volumes:");
    println!("  Boil:     {}", settings.display(&report.boil_volume)?);
    println!("  Initial:  {}", settings.display(&report.initial_volume)?);
    println!("  Primary:  {}", settings.display(&report.primary_volume)?);
    println!();
    println!("Expected:");
    for (label, value) in [
        ("Pre-boil", &report.preboil_gravity),
        ("OG", &report.gravity),
        ("FG", &report.final_gravity),
        ("Color", &report.color),
    ] {
        match value {
            Ok(q) => println!("  {:<9} {}", format!("{label}:"), settings.display(q)?),
            Err(e) => println!("  {:<9} n/a ({})", format!("{label}:"), e),
        }
    }
    for (label, value, suffix) in [
        ("IBU", &report.ibu, ""),
        ("BU:GU", &report.bitterness_ratio, ""),
        ("ABV", &report.abv, " %"),
        ("Calories", &report.calories, " kcal"),
    ] {
        match value {
            Ok(v) => println!("  {:<9} {:.2}{}", format!("{label}:"), v, suffix),
            Err(e) => println!("  {:<9} n/a ({})", format!("{label}:"), e),
        }
    }
    println!();
    Ok(())
}

// ============================================================================
// Batches
// ============================================================================

fn run_batch(path: &Path, json_only: bool) -> Result<()> {
    let batch: Batch = read_json(path)?;
    let report = batch.report();
    if !json_only {
        print_batch_summary(&report);
    }
    print_json(&report)
}

fn print_comparison(label: &str, comparison: &Comparison) {
    let expected = match &comparison.expected {
        Ok(v) => format!("{v:.3}"),
        Err(_) => "n/a".to_string(),
    };
    let actual = match &comparison.actual {
        Ok(Some(v)) => format!("{v:.3}"),
        Ok(None) => "-".to_string(),
        Err(e) => format!("error: {e}"),
    };
    println!("  {label:<16} {expected:>10} {actual:>10}");
}

fn print_batch_summary(report: &BatchReport) {
    let number = report
        .batch_number
        .map_or_else(|| "unregistered".to_string(), |n| format!("#{n}"));
    println!("Batch {} ({}) - {}", number, report.recipe, report.stage);
    if !report.missing_fields.is_empty() {
        let missing: Vec<&str> = report.missing_fields.iter().map(|f| f.as_str()).collect();
        println!("  Missing for this stage: {}", missing.join(", "));
    }
    println!();
    println!("  {:<16} {:>10} {:>10}", "", "expected", "actual");
    print_comparison("OG (SG)", &report.gravity);
    print_comparison("FG (SG)", &report.final_gravity);
    print_comparison("Efficiency (%)", &report.mash_efficiency);
    print_comparison("IBU", &report.ibu);
    print_comparison("ABV (%)", &report.abv);
    print_comparison("Attenuation (%)", &report.attenuation);
    print_comparison("Calories (kcal)", &report.calories);
    println!();
}

// ============================================================================
// Brewery
// ============================================================================

fn run_brewery(action: BreweryCommand, json_only: bool) -> Result<()> {
    match action {
        BreweryCommand::Init { path, name } => {
            if path.exists() {
                bail!("{} already exists", path.display());
            }
            save_brewery(&Brewery::new(name), &path)?;
            info!(path = %path.display(), "brewery created");
            Ok(())
        }
        BreweryCommand::Register { path, batch, holder } => {
            let batch: Batch = read_json(&batch)?;
            let _lock = FileLock::acquire(&path, holder)?;
            let mut brewery = load_brewery(&path)?;
            let id = brewery.register_batch(batch);
            save_brewery(&brewery, &path)?;
            if let Some(batch) = brewery.get_batch(&id) {
                if !json_only {
                    println!("Registered batch {} as #{}", id, batch.batch_number.unwrap_or_default());
                }
                print_json(batch)?;
            }
            Ok(())
        }
        BreweryCommand::Advance { path, batch_id, holder } => {
            transition(&path, batch_id, &holder, Transition::Advance, json_only)
        }
        BreweryCommand::Retreat { path, batch_id, holder } => {
            transition(&path, batch_id, &holder, Transition::Retreat, json_only)
        }
        BreweryCommand::Finish { path, batch_id, holder } => {
            transition(&path, batch_id, &holder, Transition::Finish, json_only)
        }
        BreweryCommand::List { path, owner } => {
            let brewery = load_brewery(&path)?;
            let batches = brewery.batches_for(&owner);
            if !json_only {
                for batch in &batches {
                    println!(
                        "#{:<4} {:<24} {}",
                        batch.batch_number.unwrap_or_default(),
                        batch.recipe.name,
                        batch.stage()
                    );
                }
            }
            print_json(&batches)
        }
    }
}

fn transition(path: &Path, batch_id: Uuid, holder: &str, kind: Transition, json_only: bool) -> Result<()> {
    let _lock = FileLock::acquire(path, holder)?;
    let mut brewery = load_brewery(path)?;
    let batch = brewery
        .get_batch_mut(&batch_id)
        .with_context(|| format!("no batch {batch_id} in {}", path.display()))?;

    let result = match kind {
        Transition::Advance => batch.advance(),
        Transition::Retreat => batch.retreat(),
        Transition::Finish => batch.finish(),
    };

    match result {
        Ok(stage) => {
            let report = batch.report();
            save_brewery(&brewery, path)?;
            info!(batch = %batch_id, %stage, "batch moved");
            if !json_only {
                print_batch_summary(&report);
            }
            print_json(&report)
        }
        Err(e) => {
            if e.is_recoverable() {
                warn!(batch = %batch_id, code = e.error_code(), "{}", e);
            }
            print_json(&e)?;
            Err(e.into())
        }
    }
}
