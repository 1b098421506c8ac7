//! JSON item dump import
//!
//! Reads item dumps keyed by item name, e.g.
//!
//! ```json
//! { "Kettle": { "recipe": { "Metal Parts": 4 },
//!               "versions": { "MK1": { "ingredients": { "Metal Parts": 6 } } } } }
//! ```
//!
//! Malformed optional fields are skipped with a warning; they never fail the
//! rest of the import.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use serde_json::{Map, Value};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::db;
use crate::error::{CookerError, Result};
use crate::models::{Item, ItemDatabase, ItemVersion, Quantities};

/// Parse a JSON document into an item database.
///
/// `source` only labels log lines and errors.
pub fn parse_item_database(json: &str, source: &str) -> Result<ItemDatabase> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(entries) = value else {
        return Err(CookerError::NotAnObject(source.to_string()));
    };

    let items = entries
        .iter()
        .map(|(name, descriptor)| parse_item(name, descriptor, source))
        .collect();
    Ok(ItemDatabase { items })
}

fn parse_item(name: &str, descriptor: &Value, source: &str) -> Item {
    let mut item = Item {
        name: name.to_string(),
        ..Item::default()
    };

    let Value::Object(fields) = descriptor else {
        warn!(source, item = name, "item descriptor is not an object, importing as empty");
        return item;
    };

    if let Some(recipe) = fields.get("recipe") {
        item.recipe = parse_ingredients(recipe, name, source);
    }

    match fields.get("versions") {
        None | Some(Value::Null) => {}
        Some(Value::Object(versions)) => {
            item.versions = parse_versions(versions, name, source);
        }
        Some(_) => warn!(source, item = name, "'versions' is not an object, ignoring"),
    }

    item
}

fn parse_versions(versions: &Map<String, Value>, item: &str, source: &str) -> Vec<ItemVersion> {
    versions
        .iter()
        .map(|(label, descriptor)| {
            let owner = format!("{item} {label}");
            let ingredients = match descriptor.get("ingredients") {
                Some(value) => parse_ingredients(value, &owner, source),
                None => Quantities::new(),
            };
            ItemVersion {
                label: label.clone(),
                ingredients,
            }
        })
        .collect()
}

fn parse_ingredients(value: &Value, owner: &str, source: &str) -> Quantities {
    let mut ingredients = Quantities::new();

    let entries = match value {
        Value::Object(entries) => entries,
        Value::Null => return ingredients,
        _ => {
            warn!(source, owner, "ingredient list is not an object, ignoring");
            return ingredients;
        }
    };

    for (ingredient, qty) in entries {
        match qty.as_u64() {
            Some(qty) if qty > 0 && i64::try_from(qty).is_ok() => ingredients.add(ingredient, qty),
            _ => warn!(
                source,
                owner,
                ingredient = ingredient.as_str(),
                quantity = %qty,
                "skipping ingredient without a positive quantity in store range"
            ),
        }
    }

    ingredients
}

/// Read and parse a single JSON file
pub fn read_item_file(path: &Path) -> Result<ItemDatabase> {
    let content = fs::read_to_string(path)?;
    parse_item_database(&content, &path.display().to_string())
}

/// Find every `*.json` file under `dir`, in file-name order
pub fn find_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Import a JSON file, or every JSON file below a directory, into the store
pub fn import_to_database(conn: &Connection, path: &Path) -> Result<ImportStats> {
    let mut stats = ImportStats::default();

    let files = if path.is_dir() {
        let files = find_json_files(path)?;
        info!(dir = %path.display(), files = files.len(), "scanning for item dumps");
        files
    } else {
        vec![path.to_path_buf()]
    };
    let single_file = !path.is_dir();

    for file in &files {
        match read_item_file(file) {
            Ok(database) => {
                for item in &database.items {
                    db::upsert_item(conn, item)?;
                    stats.items += 1;
                    stats.versions += item.versions.len();
                    if !item.recipe.is_empty() {
                        stats.recipes += 1;
                    }
                }
                stats.files += 1;
                info!(file = %file.display(), items = database.len(), "imported item dump");
            }
            // a lone file that cannot be read is the caller's problem
            Err(e) if single_file => return Err(e),
            Err(e) => {
                warn!(file = %file.display(), error = %e, "failed to import item dump");
                stats.errors += 1;
            }
        }
    }

    Ok(stats)
}

#[derive(Debug, Default)]
pub struct ImportStats {
    pub files: usize,
    pub items: usize,
    pub recipes: usize,
    pub versions: usize,
    pub errors: usize,
}

impl std::fmt::Display for ImportStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Imported {} items ({} with recipes, {} versions) from {} files. Errors: {}",
            self.items, self.recipes, self.versions, self.files, self.errors
        )
    }
}
