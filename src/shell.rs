//! Interactive planner session
//!
//! The inventory lives only as long as the session.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::debug;

use cooker::calculator;
use cooker::inventory::parse_target_quantity;
use cooker::{report, Catalog, Inventory};

#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    Add { name: String, qty: u64 },
    Set { name: String, qty: u64 },
    Remove { name: String },
    Clear,
    Show,
    Craftable,
    Shop { name: String, qty: u64 },
    Tree { name: String, qty: u64 },
    Versions { base: String },
    Upgrade { base: String, target: String },
    Efficiency,
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  add <qty> <name>          - Add to inventory
  set <qty> <name>          - Set inventory quantity (0 keeps the row)
  remove <name>             - Remove an inventory row
  clear                     - Empty the inventory
  inv / i                   - Show inventory
  craftable / c             - What can I craft now?
  shop <qty> <name>         - Shopping list for a target
  tree <qty> <name>         - Crafting tree down to base materials
  versions <base>           - Versions of an item in upgrade order
  upgrade <base> | <target> - Upgrade path up to a target version (\"III\" or \"Kettle III\")
  efficiency                - Recipes ranked by ingredient count
  help / h                  - This help
  quit / q                  - Exit
";

fn parse_command(input: &str) -> std::result::Result<ShellCommand, String> {
    let (word, rest) = match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    };

    let command = match word {
        "add" => {
            let (qty, name) = qty_and_name(rest, "add <qty> <name>")?;
            ShellCommand::Add { name, qty }
        }
        "set" => {
            let (qty, name) = split_qty(rest, "set <qty> <name>")?;
            let qty = qty
                .parse::<u64>()
                .map_err(|_| format!("'{qty}' is not a valid quantity"))?;
            ShellCommand::Set { name, qty }
        }
        "remove" | "rm" => ShellCommand::Remove {
            name: non_empty(rest, "remove <name>")?,
        },
        "clear" => ShellCommand::Clear,
        "inv" | "i" => ShellCommand::Show,
        "craftable" | "c" => ShellCommand::Craftable,
        "shop" => {
            let (qty, name) = qty_and_name(rest, "shop <qty> <name>")?;
            ShellCommand::Shop { name, qty }
        }
        "tree" => {
            let (qty, name) = qty_and_name(rest, "tree <qty> <name>")?;
            ShellCommand::Tree { name, qty }
        }
        "versions" => ShellCommand::Versions {
            base: non_empty(rest, "versions <base>")?,
        },
        "upgrade" => {
            let usage = "upgrade <base> | <target>";
            let (base, target) = rest.split_once('|').ok_or_else(|| format!("Usage: {usage}"))?;
            let base = non_empty(base.trim(), usage)?;
            let target = calculator::qualify_version(&base, &non_empty(target.trim(), usage)?);
            ShellCommand::Upgrade { base, target }
        }
        "efficiency" => ShellCommand::Efficiency,
        "help" | "h" => ShellCommand::Help,
        "quit" | "q" => ShellCommand::Quit,
        other => return Err(format!("Unknown command '{other}'. Type 'help'.")),
    };

    Ok(command)
}

fn non_empty(text: &str, usage: &str) -> std::result::Result<String, String> {
    if text.is_empty() {
        Err(format!("Usage: {usage}"))
    } else {
        Ok(text.to_string())
    }
}

fn split_qty<'a>(rest: &'a str, usage: &str) -> std::result::Result<(&'a str, String), String> {
    let (qty, name) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| format!("Usage: {usage}"))?;
    Ok((qty, non_empty(name.trim(), usage)?))
}

// target quantities must be positive
fn qty_and_name(rest: &str, usage: &str) -> std::result::Result<(u64, String), String> {
    let (qty, name) = split_qty(rest, usage)?;
    let qty = parse_target_quantity(qty).map_err(|e| e.to_string())?;
    Ok((qty, name))
}

/// Run the read-eval-print loop until `quit` or end of input
pub fn run(catalog: &Catalog, mut inventory: Inventory) -> Result<()> {
    println!("\n=== COOKER ===");
    println!("{} recipes loaded. Type 'help' for commands.", catalog.len());
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }

        let command = match parse_command(input) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        debug!(?command, "shell command");

        if command == ShellCommand::Quit {
            break;
        }
        execute(command, catalog, &mut inventory);
    }

    Ok(())
}

fn execute(command: ShellCommand, catalog: &Catalog, inventory: &mut Inventory) {
    match command {
        ShellCommand::Add { name, qty } => {
            inventory.add(&name, qty);
            println!("{} now at {}", name, inventory.get(&name));
        }
        ShellCommand::Set { name, qty } => {
            inventory.set(&name, qty);
            println!("{} set to {}", name, qty);
        }
        ShellCommand::Remove { name } => match inventory.remove(&name) {
            Some(_) => println!("Removed {}", name),
            None => println!("'{}' is not in the inventory", name),
        },
        ShellCommand::Clear => {
            inventory.clear();
            println!("Inventory cleared.");
        }
        ShellCommand::Show => {
            if inventory.is_empty() {
                println!("No ingredients added yet.");
            }
            for (name, qty) in inventory.iter() {
                println!("  {:<32} {:>8}", name, qty);
            }
        }
        ShellCommand::Craftable => {
            let results = calculator::evaluate_craftable(catalog, inventory);
            if results.is_empty() {
                println!("You cannot craft anything with the current inventory.");
            } else {
                print!("{}", report::format_craftable(&results));
            }
        }
        ShellCommand::Shop { name, qty } => {
            match calculator::shopping_list(catalog, &name, qty, inventory) {
                Some(lines) => print!("{}", report::format_requirements(&lines)),
                None => println!("Item '{}' not found in recipes", name),
            }
        }
        ShellCommand::Tree { name, qty } => {
            let tree = calculator::expand_tree(&name, qty, catalog);
            print!("{}", report::format_crafting_tree(&tree));
            println!();
            let base = calculator::requirement_table(&tree.base_needs, inventory);
            print!("{}", report::format_requirements(&base));
        }
        ShellCommand::Versions { base } => {
            let versions = calculator::list_versions(&base, catalog);
            if versions.is_empty() {
                println!("'{}' has no registered versions.", base);
            }
            for version in versions {
                println!("  {}", version);
            }
        }
        ShellCommand::Upgrade { base, target } => {
            let plan = calculator::plan_upgrade(&base, &target, catalog, inventory);
            if plan.steps.is_empty() {
                println!("Could not build an upgrade path from '{}' to '{}'.", base, target);
            } else {
                print!("{}", plan);
            }
        }
        ShellCommand::Efficiency => {
            print!("{}", report::format_efficiency(&calculator::rank_by_ingredient_count(catalog)));
        }
        ShellCommand::Help => print!("{HELP}"),
        ShellCommand::Quit => {}
    }
}
