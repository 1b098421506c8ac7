//! Data models for items, recipes and planner results

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Insertion-ordered name -> quantity mapping.
///
/// Used for recipe ingredients, aggregated base needs and upgrade totals.
/// Adding a name that is already present sums into the existing slot, so the
/// order is always first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Quantities {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl Quantities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `qty` under `name`, saturating on overflow.
    pub fn add(&mut self, name: &str, qty: u64) {
        match self.index.get(name) {
            Some(&i) => {
                let slot = &mut self.entries[i].1;
                *slot = slot.saturating_add(qty);
            }
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), qty));
            }
        }
    }

    /// Sum every entry of `other` into `self`.
    pub fn merge(&mut self, other: &Quantities) {
        for (name, qty) in other.iter() {
            self.add(name, qty);
        }
    }

    /// Quantity for `name`, zero when absent.
    pub fn get(&self, name: &str) -> u64 {
        self.index.get(name).map_or(0, |&i| self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(name, qty)| (name.as_str(), *qty))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all quantities.
    pub fn total(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |acc, (_, qty)| acc.saturating_add(*qty))
    }
}

impl<S: AsRef<str>> FromIterator<(S, u64)> for Quantities {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut out = Quantities::new();
        for (name, qty) in iter {
            out.add(name.as_ref(), qty);
        }
        out
    }
}

impl Serialize for Quantities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, qty) in &self.entries {
            map.serialize_entry(name, qty)?;
        }
        map.end()
    }
}

/// One item of the source database
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    /// Base recipe; empty when the item declares none.
    pub recipe: Quantities,
    pub versions: Vec<ItemVersion>,
}

/// A named variant of an item with its own ingredients
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemVersion {
    pub label: String,
    pub ingredients: Quantities,
}

/// The loaded item database, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDatabase {
    pub items: Vec<Item>,
}

impl ItemDatabase {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.name == name)
    }
}

/// A craftable catalog entry
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Recipe {
    /// Units produced per craft; always 1.
    pub produces: u64,
    /// Per-unit ingredient requirements.
    pub ingredients: Quantities,
}

impl Recipe {
    pub fn new(ingredients: Quantities) -> Self {
        Self {
            produces: 1,
            ingredients,
        }
    }

    /// Sum of per-unit ingredient quantities.
    pub fn ingredient_count(&self) -> u64 {
        self.ingredients.total()
    }
}

/// An entry craftable at least once from the current inventory
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CraftResult {
    pub item: String,
    pub max_units: u64,
    /// Per-unit ingredient total, not multiplied by `max_units`.
    pub total_cost: u64,
    pub ingredients: Quantities,
}

/// Required / have / missing for one ingredient
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RequirementLine {
    pub ingredient: String,
    pub required: u64,
    pub have: u64,
    pub missing: u64,
}

impl RequirementLine {
    pub fn new(ingredient: &str, required: u64, have: u64) -> Self {
        Self {
            ingredient: ingredient.to_string(),
            required,
            have,
            missing: required.saturating_sub(have),
        }
    }
}

/// One step of a crafting tree expansion, in pre-order
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TreeNode {
    pub item: String,
    pub quantity: u64,
    pub depth: usize,
}

/// Result of a crafting tree expansion
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CraftingTree {
    pub nodes: Vec<TreeNode>,
    pub base_needs: Quantities,
}

/// A single transition between consecutive versions
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UpgradeStep {
    pub from_version: String,
    pub to_version: String,
    pub ingredients: Quantities,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EfficiencyEntry {
    pub item: String,
    pub ingredient_count: u64,
}
