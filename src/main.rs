//! Cooker
//!
//! Crafting and upgrade planner for item recipe databases.

mod shell;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cooker::calculator;
use cooker::inventory::{parse_entry, Inventory};
use cooker::{build_catalog, db, import, report, sample, Catalog};

#[derive(Parser)]
#[command(name = "cooker")]
#[command(about = "Crafting and upgrade planner for item recipe databases")]
struct Cli {
    /// Path to the SQLite item store
    #[arg(short, long, default_value = "cooker.db", global = true)]
    database: PathBuf,

    /// Inventory file (JSON object or one "Name = 10" / "10x Name" per line)
    #[arg(short, long, global = true)]
    inventory: Option<PathBuf>,

    /// Extra inventory entry, e.g. --have "Metal Parts=12"; may be repeated
    #[arg(long = "have", value_name = "ENTRY", global = true)]
    have: Vec<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize empty item store with schema
    Init,

    /// Import a JSON item dump, or every *.json file below a directory
    Import {
        path: PathBuf,

        /// Clear existing items before import
        #[arg(long)]
        clear: bool,
    },

    /// Load sample items for testing (without a real dump)
    LoadSample,

    /// List all stored items
    ListItems,

    /// List every ingredient referenced by any recipe
    ListIngredients,

    /// Show the stored recipe and versions of an item
    Recipe { name: String },

    /// Show what can be crafted from the inventory
    Craftable,

    /// Shopping list for a target item (one level, no sub-recipes)
    Shop {
        item: String,

        /// Number of units wanted
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        quantity: u64,
    },

    /// Full crafting tree down to base materials
    Tree {
        item: String,

        /// Number of units wanted
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        quantity: u64,
    },

    /// List known versions of a base item, in upgrade order
    Versions { base: String },

    /// Simulate upgrading a base item up to a target version
    Upgrade {
        /// Base item name (e.g. "Kettle")
        base: String,

        /// Target version, full ("Kettle III") or just the label ("III")
        target: String,
    },

    /// Rank recipes by total ingredient count
    Efficiency,

    /// Interactive session with an in-memory inventory
    Shell,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "cooker=debug" } else { "cooker=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let conn = Connection::open(&cli.database)
        .with_context(|| format!("failed to open {}", cli.database.display()))?;
    db::init_schema(&conn)?;

    match &cli.command {
        Commands::Init => {
            println!(
                "Item store initialized at: {} ({} items)",
                cli.database.display(),
                db::count_items(&conn)?
            );
        }

        Commands::Import { path, clear } => {
            if *clear {
                println!("Clearing existing items...");
                db::clear_items(&conn)?;
            }

            let stats = import::import_to_database(&conn, path)
                .with_context(|| format!("failed to import {}", path.display()))?;
            println!("{}", stats);
        }

        Commands::LoadSample => {
            let count = sample::load_sample(&conn)?;
            println!("Loaded {} sample items", count);
        }

        Commands::ListItems => {
            let database = db::load_item_database(&conn)?;
            if database.is_empty() {
                println!("No items in store. Run 'import' or 'load-sample' first.");
            } else {
                println!("{:<40} {:>8} {:>9}", "Item", "Recipe", "Versions");
                println!("{}", "-".repeat(59));
                for item in &database.items {
                    let recipe = if item.recipe.is_empty() { "-" } else { "yes" };
                    println!("{:<40} {:>8} {:>9}", item.name, recipe, item.versions.len());
                }
            }
        }

        Commands::ListIngredients => {
            let catalog = load_catalog(&conn)?;
            let names = catalog.ingredient_names();
            emit(cli.json, &names, || {
                if names.is_empty() {
                    return "No ingredients known. Run 'import' or 'load-sample' first.\n"
                        .to_string();
                }
                names.iter().map(|n| format!("  {n}\n")).collect()
            })?;
        }

        Commands::Recipe { name } => match db::get_item(&conn, name)? {
            Some(item) => {
                println!("Item: {}", item.name);
                if !item.recipe.is_empty() {
                    println!("  Recipe: {}", report::format_ingredients(&item.recipe));
                }
                if !item.versions.is_empty() {
                    println!("  Versions:");
                    for v in &item.versions {
                        println!("    {}: {}", v.label, report::format_ingredients(&v.ingredients));
                    }
                }
            }
            None => println!("Item '{}' not found", name),
        },

        Commands::Craftable => {
            let catalog = load_catalog(&conn)?;
            let inventory = load_inventory(&cli)?;
            let results = calculator::evaluate_craftable(&catalog, &inventory);
            emit(cli.json, &results, || {
                if results.is_empty() {
                    "You cannot craft anything with the current inventory.\n".to_string()
                } else {
                    report::format_craftable(&results)
                }
            })?;
        }

        Commands::Shop { item, quantity } => {
            let catalog = load_catalog(&conn)?;
            let inventory = load_inventory(&cli)?;
            match calculator::shopping_list(&catalog, item, *quantity, &inventory) {
                Some(lines) => emit(cli.json, &lines, || {
                    format!(
                        "Shopping list for {}x {}\n\n{}",
                        quantity,
                        item,
                        report::format_requirements(&lines)
                    )
                })?,
                None => println!("Item '{}' not found in recipes", item),
            }
        }

        Commands::Tree { item, quantity } => {
            let catalog = load_catalog(&conn)?;
            let inventory = load_inventory(&cli)?;
            if !catalog.contains(item) && !cli.json {
                println!("'{}' has no recipe and is treated as a base material.\n", item);
            }
            let tree = calculator::expand_tree(item, *quantity, &catalog);
            let base = calculator::requirement_table(&tree.base_needs, &inventory);
            emit(cli.json, &tree, || {
                format!(
                    "Crafting tree:\n\n{}\nBase materials (no recipe):\n{}",
                    report::format_crafting_tree(&tree),
                    report::format_requirements(&base)
                )
            })?;
        }

        Commands::Versions { base } => {
            let catalog = load_catalog(&conn)?;
            let versions = calculator::list_versions(base, &catalog);
            emit(cli.json, &versions, || {
                if versions.is_empty() {
                    format!("'{}' has no registered versions.\n", base)
                } else {
                    versions.iter().map(|v| format!("  {v}\n")).collect()
                }
            })?;
        }

        Commands::Upgrade { base, target } => {
            let catalog = load_catalog(&conn)?;
            let inventory = load_inventory(&cli)?;
            let target = calculator::qualify_version(base, target);
            let plan = calculator::plan_upgrade(base, &target, &catalog, &inventory);
            if plan.steps.is_empty() && !cli.json {
                println!("Could not build an upgrade path from '{}' to '{}'.", base, target);
            } else {
                emit(cli.json, &plan, || plan.to_string())?;
            }
        }

        Commands::Efficiency => {
            let catalog = load_catalog(&conn)?;
            let ranked = calculator::rank_by_ingredient_count(&catalog);
            emit(cli.json, &ranked, || report::format_efficiency(&ranked))?;
        }

        Commands::Shell => {
            let catalog = load_catalog(&conn)?;
            let inventory = load_inventory(&cli)?;
            shell::run(&catalog, inventory)?;
        }
    }

    Ok(())
}

fn load_catalog(conn: &Connection) -> Result<Catalog> {
    let database = db::load_item_database(conn).context("failed to load items")?;
    Ok(build_catalog(&database))
}

fn load_inventory(cli: &Cli) -> Result<Inventory> {
    let mut inventory = match &cli.inventory {
        Some(path) => read_inventory_file(path)?,
        None => Inventory::new(),
    };

    for entry in &cli.have {
        let (name, qty) = parse_entry(entry)?;
        inventory.add(&name, qty);
    }

    Ok(inventory)
}

fn read_inventory_file(path: &Path) -> Result<Inventory> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read inventory {}", path.display()))?;
    Inventory::parse(&text).with_context(|| format!("invalid inventory {}", path.display()))
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}
