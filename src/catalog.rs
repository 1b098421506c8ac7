//! Recipe catalog: the flat table every planner query runs against

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::models::{ItemDatabase, Recipe};

/// Insertion-ordered mapping from craftable name to recipe.
///
/// Built once per loaded database and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<(String, Recipe)>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a recipe. A replaced entry keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, recipe: Recipe) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&i) => self.entries[i].1 = recipe,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, recipe));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Recipe)> {
        self.entries.iter().map(|(name, recipe)| (name.as_str(), recipe))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every ingredient referenced by any recipe, sorted and de-duplicated
    pub fn ingredient_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|(_, recipe)| recipe.ingredients.iter().map(|(name, _)| name))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Flatten an item database into a catalog.
///
/// Items with a non-empty base recipe are keyed by their own name; every
/// version becomes `"{item} {label}"`, even when its ingredient list is empty.
/// Ingredient references are not checked: names without an entry are treated
/// as base materials downstream.
pub fn build_catalog(database: &ItemDatabase) -> Catalog {
    let mut catalog = Catalog::new();

    for item in &database.items {
        if !item.recipe.is_empty() {
            catalog.insert(item.name.clone(), Recipe::new(item.recipe.clone()));
        }

        for version in &item.versions {
            let full_name = format!("{} {}", item.name, version.label);
            catalog.insert(full_name, Recipe::new(version.ingredients.clone()));
        }
    }

    debug!(
        items = database.len(),
        entries = catalog.len(),
        "built recipe catalog"
    );
    catalog
}
