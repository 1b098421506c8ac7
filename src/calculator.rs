//! Planner logic: craftability, shopping lists, crafting trees and upgrades
//!
//! Every function here is pure over its inputs. Unknown items and
//! uncraftable recipes come back as empty results or `None`, never as errors.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::catalog::Catalog;
use crate::inventory::Inventory;
use crate::models::{
    CraftResult, CraftingTree, EfficiencyEntry, Quantities, RequirementLine, TreeNode, UpgradeStep,
};

/// List every catalog entry that can be crafted at least once.
///
/// For each ingredient the craftable count is `held / required`; the entry's
/// count is the minimum over its ingredients. Entries short on any ingredient
/// are left out entirely, as are entries with no ingredients at all.
pub fn evaluate_craftable(catalog: &Catalog, inventory: &Inventory) -> Vec<CraftResult> {
    let mut results = Vec::new();

    for (item, recipe) in catalog.iter() {
        if let Some(max_units) = max_craftable(&recipe.ingredients, inventory) {
            results.push(CraftResult {
                item: item.to_string(),
                max_units,
                total_cost: recipe.ingredient_count(),
                ingredients: recipe.ingredients.clone(),
            });
        }
    }

    results
}

fn max_craftable(ingredients: &Quantities, inventory: &Inventory) -> Option<u64> {
    let mut max_units: Option<u64> = None;

    for (ingredient, required) in ingredients.iter() {
        let have = inventory.get(ingredient);
        if have < required {
            return None;
        }
        // required is positive for imported data; a zero places no limit
        let units = have.checked_div(required).unwrap_or(u64::MAX);
        max_units = Some(max_units.map_or(units, |current| current.min(units)));
    }

    max_units.filter(|&units| units > 0)
}

/// Per-ingredient shortfall for crafting `target_qty` of `target_item`.
///
/// One level only: craftable ingredients are not expanded. Returns `None`
/// when the target has no catalog entry.
pub fn shopping_list(
    catalog: &Catalog,
    target_item: &str,
    target_qty: u64,
    inventory: &Inventory,
) -> Option<Vec<RequirementLine>> {
    let recipe = catalog.get(target_item)?;

    let lines = recipe
        .ingredients
        .iter()
        .map(|(ingredient, per_unit)| {
            RequirementLine::new(
                ingredient,
                per_unit.saturating_mul(target_qty),
                inventory.get(ingredient),
            )
        })
        .collect();

    Some(lines)
}

/// Required / have / missing rows for an aggregated needs mapping
pub fn requirement_table(needs: &Quantities, inventory: &Inventory) -> Vec<RequirementLine> {
    needs
        .iter()
        .map(|(ingredient, required)| {
            RequirementLine::new(ingredient, required, inventory.get(ingredient))
        })
        .collect()
}

/// All catalog entries ordered by per-unit ingredient count, cheapest first.
/// Ties keep catalog order.
pub fn rank_by_ingredient_count(catalog: &Catalog) -> Vec<EfficiencyEntry> {
    let mut ranked: Vec<EfficiencyEntry> = catalog
        .iter()
        .map(|(item, recipe)| EfficiencyEntry {
            item: item.to_string(),
            ingredient_count: recipe.ingredient_count(),
        })
        .collect();

    ranked.sort_by_key(|entry| entry.ingredient_count);
    ranked
}

/// Expand `item` down to base materials.
///
/// Nodes come back in depth-first pre-order, the root first. A name with no
/// catalog entry is a base material. A name already on the current path is a
/// cycle: its outstanding demand is recorded as a base need instead of being
/// expanded again, so cyclic recipes undercount their true cost.
pub fn expand_tree(item: &str, qty: u64, catalog: &Catalog) -> CraftingTree {
    let mut tree = CraftingTree {
        nodes: Vec::new(),
        base_needs: Quantities::new(),
    };
    let mut path = HashSet::new();

    expand_recursive(item, qty, 0, catalog, &mut path, &mut tree);
    tree
}

fn expand_recursive<'a>(
    item: &'a str,
    qty: u64,
    depth: usize,
    catalog: &'a Catalog,
    path: &mut HashSet<&'a str>,
    tree: &mut CraftingTree,
) {
    tree.nodes.push(TreeNode {
        item: item.to_string(),
        quantity: qty,
        depth,
    });

    let recipe = match catalog.get(item) {
        Some(recipe) if !path.contains(item) => recipe,
        Some(_) => {
            debug!(item, depth, "cycle detected, treating as base material");
            tree.base_needs.add(item, qty);
            return;
        }
        None => {
            tree.base_needs.add(item, qty);
            return;
        }
    };

    path.insert(item);
    for (ingredient, per_unit) in recipe.ingredients.iter() {
        expand_recursive(
            ingredient,
            per_unit.saturating_mul(qty),
            depth + 1,
            catalog,
            path,
            tree,
        );
    }
    path.remove(item);
}

/// All version entries of `base_item`, sorted lexically by full name.
///
/// The order is plain string order, so "MK10" sorts before "MK2".
pub fn list_versions(base_item: &str, catalog: &Catalog) -> Vec<String> {
    let prefix = format!("{base_item} ");
    let mut versions: Vec<String> = catalog
        .names()
        .filter(|name| name.starts_with(&prefix))
        .map(str::to_string)
        .collect();
    versions.sort();
    versions
}

/// Accept "III" as shorthand for "Kettle III".
pub fn qualify_version(base_item: &str, target: &str) -> String {
    if target.starts_with(&format!("{base_item} ")) {
        target.to_string()
    } else {
        format!("{base_item} {target}")
    }
}

/// Steps along the version chain of `base_item` up to `target_version`.
///
/// The chain is the lexically sorted version list; steps are consecutive
/// pairs, cut after the first step that lands on the target. Each step costs
/// the destination's full recipe. An unknown target yields no steps.
pub fn simulate_upgrade(
    base_item: &str,
    target_version: &str,
    catalog: &Catalog,
) -> Vec<UpgradeStep> {
    let versions = list_versions(base_item, catalog);
    if !versions.iter().any(|v| v == target_version) {
        return Vec::new();
    }

    let mut steps = Vec::new();
    for pair in versions.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        let ingredients = catalog
            .get(to)
            .map(|recipe| recipe.ingredients.clone())
            .unwrap_or_default();

        steps.push(UpgradeStep {
            from_version: from.clone(),
            to_version: to.clone(),
            ingredients,
        });

        if to == target_version {
            break;
        }
    }

    steps
}

/// Per-ingredient totals across upgrade steps, in first-seen order
pub fn upgrade_cost(steps: &[UpgradeStep]) -> Quantities {
    let mut total = Quantities::new();
    for step in steps {
        total.merge(&step.ingredients);
    }
    total
}

/// Result of planning an upgrade against an inventory
#[derive(Debug, Clone, Serialize)]
pub struct UpgradePlan {
    pub base_item: String,
    pub target_version: String,
    pub steps: Vec<UpgradeStep>,
    pub totals: Vec<RequirementLine>,
}

/// Simulate the upgrade chain and compare its total cost with the inventory
pub fn plan_upgrade(
    base_item: &str,
    target_version: &str,
    catalog: &Catalog,
    inventory: &Inventory,
) -> UpgradePlan {
    let steps = simulate_upgrade(base_item, target_version, catalog);
    let totals = requirement_table(&upgrade_cost(&steps), inventory);

    UpgradePlan {
        base_item: base_item.to_string(),
        target_version: target_version.to_string(),
        steps,
        totals,
    }
}
