//! Text rendering of planner results

use std::fmt::Write as _;

use crate::calculator::UpgradePlan;
use crate::models::{CraftResult, CraftingTree, EfficiencyEntry, Quantities, RequirementLine};

/// "6x Metal Parts, 1x Wires"
pub fn format_ingredients(ingredients: &Quantities) -> String {
    ingredients
        .iter()
        .map(|(name, qty)| format!("{qty}x {name}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_craftable(results: &[CraftResult]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{:<32} {:>10} {:>10}  Ingredients", "Item", "Max units", "Cost/unit");
    let _ = writeln!(output, "{}", "-".repeat(68));
    for r in results {
        let _ = writeln!(
            output,
            "{:<32} {:>10} {:>10}  {}",
            r.item,
            r.max_units,
            r.total_cost,
            format_ingredients(&r.ingredients)
        );
    }
    output
}

/// Required / have / missing table, shared by shopping lists, base needs and
/// upgrade totals
pub fn format_requirements(lines: &[RequirementLine]) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:<32} {:>10} {:>10} {:>10}",
        "Ingredient", "Required", "Have", "Missing"
    );
    let _ = writeln!(output, "{}", "-".repeat(65));
    for line in lines {
        let _ = writeln!(
            output,
            "{:<32} {:>10} {:>10} {:>10}",
            line.ingredient, line.required, line.have, line.missing
        );
    }
    output
}

/// Indented crafting tree, two spaces per level
pub fn format_crafting_tree(tree: &CraftingTree) -> String {
    let mut output = String::new();
    for node in &tree.nodes {
        let prefix = "  ".repeat(node.depth);
        let _ = writeln!(output, "{}{}x {}", prefix, node.quantity, node.item);
    }
    output
}

pub fn format_efficiency(entries: &[EfficiencyEntry]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{:<40} {:>12}", "Item", "Ingredients");
    let _ = writeln!(output, "{}", "-".repeat(53));
    for entry in entries {
        let _ = writeln!(output, "{:<40} {:>12}", entry.item, entry.ingredient_count);
    }
    output
}

impl std::fmt::Display for UpgradePlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Upgrade path: {} ===", self.target_version)?;
        writeln!(f)?;

        for step in &self.steps {
            writeln!(
                f,
                "  {} -> {}: {}",
                step.from_version,
                step.to_version,
                format_ingredients(&step.ingredients)
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Total direct upgrade cost (crafting not expanded):")?;
        write!(f, "{}", format_requirements(&self.totals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TreeNode;

    #[test]
    fn test_format_ingredients() {
        let q: Quantities = [("Metal Parts", 6u64), ("Wires", 1)].into_iter().collect();
        assert_eq!(format_ingredients(&q), "6x Metal Parts, 1x Wires");
    }

    #[test]
    fn test_format_crafting_tree_indents_by_depth() {
        let tree = CraftingTree {
            nodes: vec![
                TreeNode { item: "Net".to_string(), quantity: 1, depth: 0 },
                TreeNode { item: "Rope".to_string(), quantity: 3, depth: 1 },
                TreeNode { item: "Fiber".to_string(), quantity: 6, depth: 2 },
            ],
            base_needs: Quantities::new(),
        };
        assert_eq!(format_crafting_tree(&tree), "1x Net\n  3x Rope\n    6x Fiber\n");
    }
}
