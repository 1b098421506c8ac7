//! Sample item data for trying the planner without a real dump

use rusqlite::Connection;
use tracing::info;

use crate::db;
use crate::error::Result;
use crate::import::parse_item_database;

pub const SAMPLE_ITEMS: &str = r#"{
    "Rope": { "recipe": { "Fabric": 2 } },
    "Zipline": { "recipe": { "Rope": 2, "Metal Parts": 3 } },
    "Bandage": { "recipe": { "Fabric": 2 } },
    "Herbal Bandage": { "recipe": { "Bandage": 1, "Assorted Seeds": 2 } },
    "Adrenaline Shot": { "recipe": { "Chemicals": 3, "Plastic Parts": 1 } },
    "Mechanical Components": { "recipe": { "Metal Parts": 3, "Rubber Parts": 2 } },
    "Advanced Mechanical Components": {
        "recipe": { "Mechanical Components": 2, "Steel Spring": 1 }
    },
    "Kettle": {
        "versions": {
            "I": { "ingredients": { "Metal Parts": 6, "Rubber Parts": 8 } },
            "II": { "ingredients": { "Metal Parts": 8, "Plastic Parts": 10 } },
            "III": { "ingredients": { "Mechanical Components": 3, "Simple Gun Parts": 1 } },
            "IV": { "ingredients": { "Advanced Mechanical Components": 2, "Simple Gun Parts": 1 } }
        }
    },
    "Anvil": {
        "recipe": { "Metal Parts": 5, "Rubber Parts": 2 },
        "versions": {
            "I": { "ingredients": { "Metal Parts": 5, "Rubber Parts": 2 } },
            "II": { "ingredients": { "Mechanical Components": 2 } },
            "III": { "ingredients": { "Advanced Mechanical Components": 1, "Metal Parts": 4 } }
        }
    }
}"#;

/// Replace the store contents with the sample items; returns the item count.
pub fn load_sample(conn: &Connection) -> Result<usize> {
    db::clear_items(conn)?;

    let database = parse_item_database(SAMPLE_ITEMS, "sample")?;
    for item in &database.items {
        db::upsert_item(conn, item)?;
    }

    info!(items = database.len(), "loaded sample items");
    Ok(database.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_catalog;
    use crate::calculator::list_versions;

    #[test]
    fn test_sample_loads_with_versions() {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();

        assert_eq!(load_sample(&conn).unwrap(), 9);

        let catalog = build_catalog(&db::load_item_database(&conn).unwrap());
        assert_eq!(
            list_versions("Kettle", &catalog),
            vec!["Kettle I", "Kettle II", "Kettle III", "Kettle IV"]
        );
        assert!(catalog.contains("Anvil"));
        assert!(catalog.contains("Anvil I"));
    }
}
