//! Crafting and upgrade planner
//!
//! Turns an item database into a flat recipe catalog and answers planning
//! questions against an inventory: what can be crafted now, what is missing
//! for a target, what a full crafting tree costs in base materials, and what
//! an upgrade through an item's versions costs.

pub mod calculator;
pub mod catalog;
pub mod db;
pub mod error;
pub mod import;
pub mod inventory;
pub mod models;
pub mod report;
pub mod sample;

pub use catalog::{build_catalog, Catalog};
pub use error::{CookerError, Result};
pub use inventory::Inventory;
