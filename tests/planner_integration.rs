//! Planner integration tests
//!
//! Runs the full path from a JSON item dump through the SQLite store and the
//! catalog builder into every planner query.

use std::fs;

use cooker::calculator::{
    evaluate_craftable, expand_tree, list_versions, plan_upgrade, requirement_table,
    shopping_list, simulate_upgrade,
};
use cooker::models::RequirementLine;
use cooker::{build_catalog, db, import, Catalog, Inventory};
use rusqlite::Connection;
use tempfile::TempDir;

const ROPE_NET: &str = r#"{
    "Rope": { "recipe": { "Fiber": 2 } },
    "Net": { "recipe": { "Rope": 3 } }
}"#;

const KETTLE: &str = r#"{
    "Kettle": {
        "versions": {
            "MK3": { "ingredients": { "Metal Parts": 8, "Wires": 2 } },
            "MK1": { "ingredients": { "Metal Parts": 4 } },
            "MK2": { "ingredients": { "Metal Parts": 6, "Wires": 1 } }
        }
    }
}"#;

fn store_with(files: &[(&str, &str)]) -> (TempDir, Connection) {
    let dir = TempDir::new().unwrap();
    let dump_dir = dir.path().join("dumps");
    fs::create_dir(&dump_dir).unwrap();
    for (name, content) in files {
        fs::write(dump_dir.join(name), content).unwrap();
    }

    let conn = Connection::open(dir.path().join("cooker.db")).unwrap();
    db::init_schema(&conn).unwrap();
    import::import_to_database(&conn, &dump_dir).unwrap();
    (dir, conn)
}

fn catalog_of(conn: &Connection) -> Catalog {
    build_catalog(&db::load_item_database(conn).unwrap())
}

#[test]
fn rope_net_end_to_end() {
    let (_dir, conn) = store_with(&[("items.json", ROPE_NET)]);
    let catalog = catalog_of(&conn);
    let inventory: Inventory = [("Fiber", 10u64)].into_iter().collect();

    let tree = expand_tree("Net", 1, &catalog);
    let nodes: Vec<_> = tree
        .nodes
        .iter()
        .map(|n| (n.item.as_str(), n.quantity, n.depth))
        .collect();
    assert_eq!(nodes, vec![("Net", 1, 0), ("Rope", 3, 1), ("Fiber", 6, 2)]);
    assert_eq!(tree.base_needs.iter().collect::<Vec<_>>(), vec![("Fiber", 6)]);

    let base = requirement_table(&tree.base_needs, &inventory);
    assert_eq!(base, vec![RequirementLine::new("Fiber", 6, 10)]);

    let craftable = evaluate_craftable(&catalog, &inventory);
    assert_eq!(craftable.len(), 1);
    assert_eq!(craftable[0].item, "Rope");
    assert_eq!(craftable[0].max_units, 5);

    let shop = shopping_list(&catalog, "Net", 1, &inventory).unwrap();
    assert_eq!(shop, vec![RequirementLine::new("Rope", 3, 0)]);
}

#[test]
fn directory_import_merges_files_in_name_order() {
    let (_dir, conn) = store_with(&[
        ("b_kettle.json", KETTLE),
        ("a_rope.json", ROPE_NET),
        ("notes.txt", "not json"),
    ]);

    let catalog = catalog_of(&conn);
    let names: Vec<_> = catalog.names().collect();
    assert_eq!(
        names,
        vec!["Rope", "Net", "Kettle MK3", "Kettle MK1", "Kettle MK2"]
    );
}

#[test]
fn broken_file_in_directory_is_counted_not_fatal() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.json"), ROPE_NET).unwrap();
    fs::write(dir.path().join("b.json"), "[1, 2]").unwrap();
    fs::write(dir.path().join("c.json"), "{ broken").unwrap();

    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let stats = import::import_to_database(&conn, dir.path()).unwrap();

    assert_eq!(stats.files, 1);
    assert_eq!(stats.errors, 2);
    assert_eq!(stats.items, 2);
}

#[test]
fn single_bad_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "[]").unwrap();

    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    assert!(import::import_to_database(&conn, &path).is_err());
}

#[test]
fn kettle_upgrade_chain() {
    let (_dir, conn) = store_with(&[("kettle.json", KETTLE)]);
    let catalog = catalog_of(&conn);

    assert_eq!(
        list_versions("Kettle", &catalog),
        vec!["Kettle MK1", "Kettle MK2", "Kettle MK3"]
    );

    let steps = simulate_upgrade("Kettle", "Kettle MK2", &catalog);
    assert_eq!(steps.len(), 1);
    assert_eq!(
        (steps[0].from_version.as_str(), steps[0].to_version.as_str()),
        ("Kettle MK1", "Kettle MK2")
    );

    let inventory: Inventory = [("Metal Parts", 20u64)].into_iter().collect();
    let plan = plan_upgrade("Kettle", "Kettle MK3", &catalog, &inventory);
    assert_eq!(plan.steps.len(), 2);
    assert_eq!(
        plan.totals,
        vec![
            RequirementLine::new("Metal Parts", 14, 20),
            RequirementLine::new("Wires", 3, 0),
        ]
    );
}

#[test]
fn reimport_replaces_recipes() {
    let (dir, conn) = store_with(&[("items.json", ROPE_NET)]);

    let update = dir.path().join("update.json");
    fs::write(&update, r#"{"Rope": {"recipe": {"Fiber": 4}}}"#).unwrap();
    import::import_to_database(&conn, &update).unwrap();

    let catalog = catalog_of(&conn);
    let tree = expand_tree("Net", 1, &catalog);
    assert_eq!(tree.base_needs.get("Fiber"), 12);
}

#[test]
fn results_serialize_as_plain_json() {
    let (_dir, conn) = store_with(&[("items.json", ROPE_NET)]);
    let catalog = catalog_of(&conn);

    let tree = expand_tree("Net", 2, &catalog);
    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json["base_needs"]["Fiber"], 12);
    assert_eq!(json["nodes"][1]["item"], "Rope");
    assert_eq!(json["nodes"][1]["depth"], 1);
}
