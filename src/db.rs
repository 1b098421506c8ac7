//! Database schema and operations for the item store

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::error::{CookerError, Result};
use crate::models::{Item, ItemDatabase, ItemVersion, Quantities};

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Items in first-imported order (id doubles as position)
        CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );

        -- Base recipe ingredients
        CREATE TABLE IF NOT EXISTS item_recipe (
            item_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            ingredient TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            PRIMARY KEY (item_id, position)
        );

        -- Named variants of an item
        CREATE TABLE IF NOT EXISTS item_versions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            item_id INTEGER NOT NULL,
            label TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS version_ingredients (
            version_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            ingredient TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            PRIMARY KEY (version_id, position)
        );

        CREATE INDEX IF NOT EXISTS idx_item_versions_item ON item_versions(item_id);
        "#,
    )?;
    Ok(())
}

/// Insert an item, or replace the recipe and versions of an existing one.
///
/// A replaced item keeps its original position.
/// Runs in its own transaction, so a failed insert leaves the stored item as it was.
pub fn upsert_item(conn: &Connection, item: &Item) -> Result<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute("INSERT OR IGNORE INTO items (name) VALUES (?1)", [&item.name])?;
    let item_id: i64 = tx.query_row(
        "SELECT id FROM items WHERE name = ?1",
        [&item.name],
        |row| row.get(0),
    )?;

    delete_item_details(&tx, item_id)?;

    for (position, (ingredient, quantity)) in item.recipe.iter().enumerate() {
        tx.execute(
            "INSERT INTO item_recipe (item_id, position, ingredient, quantity)
             VALUES (?1, ?2, ?3, ?4)",
            (item_id, position as i64, ingredient, stored_quantity(ingredient, quantity)?),
        )?;
    }

    for version in &item.versions {
        tx.execute(
            "INSERT INTO item_versions (item_id, label) VALUES (?1, ?2)",
            (item_id, &version.label),
        )?;
        let version_id = tx.last_insert_rowid();

        for (position, (ingredient, quantity)) in version.ingredients.iter().enumerate() {
            tx.execute(
                "INSERT INTO version_ingredients (version_id, position, ingredient, quantity)
                 VALUES (?1, ?2, ?3, ?4)",
                (version_id, position as i64, ingredient, stored_quantity(ingredient, quantity)?),
            )?;
        }
    }

    tx.commit()?;
    Ok(())
}

// SQLite integers are signed
fn stored_quantity(ingredient: &str, quantity: u64) -> Result<i64> {
    i64::try_from(quantity).map_err(|_| CookerError::QuantityOutOfRange {
        ingredient: ingredient.to_string(),
        quantity: quantity.to_string(),
    })
}

fn delete_item_details(conn: &Connection, item_id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM version_ingredients
         WHERE version_id IN (SELECT id FROM item_versions WHERE item_id = ?1)",
        [item_id],
    )?;
    conn.execute("DELETE FROM item_versions WHERE item_id = ?1", [item_id])?;
    conn.execute("DELETE FROM item_recipe WHERE item_id = ?1", [item_id])?;
    Ok(())
}

/// Clear all stored items (for re-import)
pub fn clear_items(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DELETE FROM version_ingredients;
        DELETE FROM item_versions;
        DELETE FROM item_recipe;
        DELETE FROM items;
        "#,
    )?;
    Ok(())
}

/// Load the whole item database in stored order
pub fn load_item_database(conn: &Connection) -> Result<ItemDatabase> {
    let mut stmt = conn.prepare("SELECT id, name FROM items ORDER BY id")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;

    let mut heads = Vec::new();
    for row in rows {
        heads.push(row?);
    }

    let mut items = Vec::with_capacity(heads.len());
    for (item_id, name) in heads {
        items.push(Item {
            name,
            recipe: get_item_recipe(conn, item_id)?,
            versions: get_item_versions(conn, item_id)?,
        });
    }

    info!(items = items.len(), "loaded item database");
    Ok(ItemDatabase { items })
}

fn get_item_recipe(conn: &Connection, item_id: i64) -> Result<Quantities> {
    let mut stmt = conn.prepare(
        "SELECT ingredient, quantity FROM item_recipe WHERE item_id = ?1 ORDER BY position",
    )?;
    collect_quantities(&mut stmt, item_id)
}

fn get_item_versions(conn: &Connection, item_id: i64) -> Result<Vec<ItemVersion>> {
    let mut stmt =
        conn.prepare("SELECT id, label FROM item_versions WHERE item_id = ?1 ORDER BY id")?;
    let rows = stmt.query_map([item_id], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut heads = Vec::new();
    for row in rows {
        heads.push(row?);
    }

    let mut ingredient_stmt = conn.prepare(
        "SELECT ingredient, quantity FROM version_ingredients WHERE version_id = ?1 ORDER BY position",
    )?;
    let mut versions = Vec::with_capacity(heads.len());
    for (version_id, label) in heads {
        versions.push(ItemVersion {
            label,
            ingredients: collect_quantities(&mut ingredient_stmt, version_id)?,
        });
    }
    Ok(versions)
}

fn collect_quantities(stmt: &mut rusqlite::Statement<'_>, owner_id: i64) -> Result<Quantities> {
    let rows = stmt.query_map([owner_id], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut quantities = Quantities::new();
    for row in rows {
        let (ingredient, quantity) = row?;
        let quantity = u64::try_from(quantity).map_err(|_| CookerError::QuantityOutOfRange {
            ingredient: ingredient.clone(),
            quantity: quantity.to_string(),
        })?;
        quantities.add(&ingredient, quantity);
    }
    Ok(quantities)
}

/// Look up a single stored item by name
pub fn get_item(conn: &Connection, name: &str) -> Result<Option<Item>> {
    let item_id: Option<i64> = conn
        .query_row("SELECT id FROM items WHERE name = ?1", [name], |row| row.get(0))
        .optional()?;

    let Some(item_id) = item_id else {
        return Ok(None);
    };

    Ok(Some(Item {
        name: name.to_string(),
        recipe: get_item_recipe(conn, item_id)?,
        versions: get_item_versions(conn, item_id)?,
    }))
}

/// Count stored items
pub fn count_items(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
    Ok(count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn item(name: &str, recipe: &[(&str, u64)], versions: &[(&str, &[(&str, u64)])]) -> Item {
        Item {
            name: name.to_string(),
            recipe: recipe.iter().map(|&(n, q)| (n, q)).collect(),
            versions: versions
                .iter()
                .map(|&(label, ingredients)| ItemVersion {
                    label: label.to_string(),
                    ingredients: ingredients.iter().map(|&(n, q)| (n, q)).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let conn = memory_db();
        let items = vec![
            item("Zipline", &[("Rope", 2), ("Metal Parts", 1)], &[]),
            item(
                "Kettle",
                &[],
                &[("MK2", &[("Wires", 1)]), ("MK1", &[("Metal Parts", 4)])],
            ),
        ];
        for i in &items {
            upsert_item(&conn, i).unwrap();
        }

        let loaded = load_item_database(&conn).unwrap();
        assert_eq!(loaded.items, items);
    }

    #[test]
    fn test_upsert_replaces_details_keeps_position() {
        let conn = memory_db();
        upsert_item(&conn, &item("Rope", &[("Fiber", 2)], &[])).unwrap();
        upsert_item(&conn, &item("Net", &[("Rope", 3)], &[])).unwrap();
        upsert_item(&conn, &item("Rope", &[("Fiber", 5)], &[("MK1", &[])])).unwrap();

        let loaded = load_item_database(&conn).unwrap();
        let names: Vec<_> = loaded.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Rope", "Net"]);
        assert_eq!(loaded.items[0].recipe.get("Fiber"), 5);
        assert_eq!(loaded.items[0].versions.len(), 1);
        assert_eq!(count_items(&conn).unwrap(), 2);
    }

    #[test]
    fn test_get_item_and_clear() {
        let conn = memory_db();
        upsert_item(&conn, &item("Rope", &[("Fiber", 2)], &[])).unwrap();

        assert!(get_item(&conn, "Rope").unwrap().is_some());
        assert!(get_item(&conn, "Boat").unwrap().is_none());

        clear_items(&conn).unwrap();
        assert_eq!(count_items(&conn).unwrap(), 0);
    }

    #[test]
    fn test_largest_storable_quantity_round_trips() {
        let conn = memory_db();
        let limit = i64::MAX as u64;
        let stored = item("Vault", &[("Gold", limit)], &[("MK1", &[("Gold", limit - 1)])]);
        upsert_item(&conn, &stored).unwrap();

        let loaded = load_item_database(&conn).unwrap();
        assert_eq!(loaded.items, vec![stored]);
    }

    #[test]
    fn test_upsert_rejects_quantity_beyond_store_range() {
        let conn = memory_db();
        let err = upsert_item(&conn, &item("Vault", &[("Gold", i64::MAX as u64 + 1)], &[]))
            .unwrap_err();

        assert!(matches!(err, CookerError::QuantityOutOfRange { ref ingredient, .. } if ingredient == "Gold"));
        assert_eq!(count_items(&conn).unwrap(), 0);
    }

    #[test]
    fn test_negative_stored_quantity_fails_load() {
        let conn = memory_db();
        upsert_item(&conn, &item("Rope", &[("Fiber", 2)], &[])).unwrap();
        conn.execute("UPDATE item_recipe SET quantity = -5", []).unwrap();

        let err = load_item_database(&conn).unwrap_err();
        assert!(matches!(err, CookerError::QuantityOutOfRange { ref quantity, .. } if quantity == "-5"));
        assert!(get_item(&conn, "Rope").is_err());
    }

    #[test]
    fn test_failed_upsert_keeps_previous_details() {
        let conn = memory_db();
        upsert_item(&conn, &item("Stew", &[("Meat", 2)], &[("MK1", &[("Meat", 3)])])).unwrap();
        conn.execute_batch(
            "CREATE TRIGGER reject_poison BEFORE INSERT ON item_recipe
             WHEN NEW.ingredient = 'Poison'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();

        let replacement = item("Stew", &[("Meat", 1), ("Poison", 1)], &[]);
        assert!(upsert_item(&conn, &replacement).is_err());

        let stew = get_item(&conn, "Stew").unwrap().unwrap();
        assert_eq!(stew.recipe.iter().collect::<Vec<_>>(), vec![("Meat", 2)]);
        assert_eq!(stew.versions.len(), 1);
        assert_eq!(stew.versions[0].ingredients.get("Meat"), 3);
    }
}
