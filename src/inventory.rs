//! In-memory inventory and its text formats
//!
//! The inventory is owned by the caller (CLI or shell session) and handed to
//! the planner as a read-only snapshot. It is never written to disk.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{CookerError, Result};

// "Fiber = 10", "Fiber: 10" or "10x Fiber"
static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:(?P<lead>\d+)\s*x\s+(?P<lname>\S.*?)|(?P<tname>\S.*?)\s*[=:]\s*(?P<trail>\d+))\s*$")
        .expect("inventory entry pattern is valid")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Inventory {
    held: BTreeMap<String, u64>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Held quantity, zero for unknown names
    pub fn get(&self, name: &str) -> u64 {
        self.held.get(name).copied().unwrap_or(0)
    }

    /// Add to the held quantity, creating the entry if needed.
    pub fn add(&mut self, name: &str, qty: u64) {
        let slot = self.held.entry(name.to_string()).or_insert(0);
        *slot = slot.saturating_add(qty);
    }

    /// Overwrite the held quantity. Setting zero keeps the entry listed.
    pub fn set(&mut self, name: &str, qty: u64) {
        self.held.insert(name.to_string(), qty);
    }

    /// Drop an entry; returns the quantity that was held.
    pub fn remove(&mut self, name: &str) -> Option<u64> {
        self.held.remove(name)
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.held.iter().map(|(name, qty)| (name.as_str(), *qty))
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Parse an inventory file.
    ///
    /// Accepts either a JSON object of name -> quantity, or one entry per line
    /// (`Name = 10`, `Name: 10`, `10x Name`). Blank lines and `#` comments are
    /// skipped, and repeated names are summed.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim_start().starts_with('{') {
            let held: BTreeMap<String, u64> = serde_json::from_str(text)?;
            return Ok(Self { held });
        }

        let mut inventory = Self::new();
        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (name, qty) = parse_entry(line).map_err(|_| CookerError::InventoryParse {
                line: i + 1,
                content: line.to_string(),
            })?;
            inventory.add(&name, qty);
        }
        Ok(inventory)
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut inventory = Inventory::new();
        for (name, qty) in iter {
            let name: String = name.into();
            inventory.add(&name, qty);
        }
        inventory
    }
}

/// Parse a single `Name=10` / `10x Name` entry.
pub fn parse_entry(entry: &str) -> Result<(String, u64)> {
    let caps = ENTRY_RE
        .captures(entry)
        .ok_or_else(|| CookerError::InvalidEntry(entry.to_string()))?;

    let (name, digits) = match (caps.name("lead"), caps.name("lname")) {
        (Some(qty), Some(name)) => (name.as_str(), qty.as_str()),
        _ => match (caps.name("tname"), caps.name("trail")) {
            (Some(name), Some(qty)) => (name.as_str(), qty.as_str()),
            _ => return Err(CookerError::InvalidEntry(entry.to_string())),
        },
    };

    let qty = digits
        .parse::<u64>()
        .map_err(|_| CookerError::InvalidQuantity(digits.to_string()))?;
    Ok((name.trim().to_string(), qty))
}

/// Parse a target quantity; zero and non-numbers are rejected.
pub fn parse_target_quantity(text: &str) -> Result<u64> {
    match text.trim().parse::<u64>() {
        Ok(qty) if qty > 0 => Ok(qty),
        _ => Err(CookerError::InvalidQuantity(text.to_string())),
    }
}
