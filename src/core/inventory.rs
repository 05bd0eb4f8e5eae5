//! The authoritative package catalogue.
//!
//! An [`Inventory`] is built once at startup and shared behind an `Arc` for the
//! rest of the process. Nothing writes to it after construction, which is why
//! concurrent requests read it without any lock. Keep it that way: there is no
//! API to insert, update or remove records, and adding one would require
//! introducing synchronization at every grounding check.

use crate::domain::model::PackageRecord;
use crate::utils::error::{Result, ScoutError};
use std::collections::{HashMap, HashSet};
use std::path::Path;

const BUILTIN_INVENTORY: &str = include_str!("../../data/inventory.json");

#[derive(Debug, Clone)]
pub struct Inventory {
    records: Vec<PackageRecord>,
    // id -> position in `records`
    index: HashMap<i64, usize>,
}

impl Inventory {
    /// Build an inventory, rejecting duplicate ids and invalid records.
    pub fn new(records: Vec<PackageRecord>) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if record.title.trim().is_empty() {
                return Err(ScoutError::InventoryError {
                    message: format!("package {} has an empty title", record.id),
                });
            }
            if !record.price.is_finite() || record.price < 0.0 {
                return Err(ScoutError::InventoryError {
                    message: format!(
                        "package {} has invalid price {}",
                        record.id, record.price
                    ),
                });
            }
            if index.insert(record.id, position).is_some() {
                return Err(ScoutError::InventoryError {
                    message: format!("duplicate package id {}", record.id),
                });
            }
        }

        Ok(Self { records, index })
    }

    /// The catalogue compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_INVENTORY)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let records: Vec<PackageRecord> =
            serde_json::from_str(content).map_err(|e| ScoutError::InventoryError {
                message: format!("inventory is not a valid package list: {}", e),
            })?;
        Self::new(records)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let inventory = Self::from_json_str(&content)?;
        tracing::info!(
            "Loaded {} packages from {}",
            inventory.len(),
            path.as_ref().display()
        );
        Ok(inventory)
    }

    /// Load from `path` when given, otherwise fall back to the builtin catalogue.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    pub fn all(&self) -> &[PackageRecord] {
        &self.records
    }

    /// Records for `ids`, in the order the ids were given. Unknown ids are
    /// skipped; repeated ids yield repeated records.
    pub fn get_by_ids(&self, ids: &[i64]) -> Vec<PackageRecord> {
        ids.iter()
            .filter_map(|id| self.index.get(id))
            .map(|&position| self.records[position].clone())
            .collect()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.index.contains_key(&id)
    }

    pub fn position(&self, id: i64) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn ids(&self) -> HashSet<i64> {
        self.index.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn record(id: i64, title: &str, price: f64, tags: &[&str]) -> PackageRecord {
    PackageRecord {
        id,
        title: title.to_string(),
        location: format!("{} Location", title),
        price,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample() -> Inventory {
        Inventory::new(vec![
            record(1, "Beach", 100.0, &["beach"]),
            record(2, "Alps", 1500.0, &["hiking"]),
            record(3, "Rome", 650.0, &["history"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_builtin_inventory_loads() {
        let inventory = Inventory::builtin().unwrap();
        assert!(!inventory.is_empty());
        assert!(inventory.all().iter().all(|p| p.price >= 0.0));
    }

    #[test]
    fn test_get_by_ids_preserves_input_order() {
        let inventory = sample();
        let records = inventory.get_by_ids(&[3, 1]);
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_get_by_ids_drops_unknown_ids() {
        let inventory = sample();
        let records = inventory.get_by_ids(&[999, 2, -4]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 2);
        assert!(inventory.get_by_ids(&[]).is_empty());
    }

    #[test]
    fn test_position_follows_storage_order() {
        let inventory = sample();
        assert_eq!(inventory.position(1), Some(0));
        assert_eq!(inventory.position(3), Some(2));
        assert_eq!(inventory.position(42), None);
        assert!(inventory.contains(2));
        assert!(!inventory.contains(42));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = Inventory::new(vec![
            record(1, "Beach", 100.0, &[]),
            record(1, "Other Beach", 200.0, &[]),
        ]);
        assert!(matches!(result, Err(ScoutError::InventoryError { .. })));
    }

    #[test]
    fn test_rejects_negative_price() {
        let result = Inventory::new(vec![record(1, "Beach", -1.0, &[])]);
        assert!(matches!(result, Err(ScoutError::InventoryError { .. })));
    }

    #[test]
    fn test_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let content = r#"[
            {"id": 7, "title": "Fjords", "location": "Bergen, Norway", "price": 1200, "tags": ["nature"]}
        ]"#;
        temp_file.write_all(content.as_bytes()).unwrap();

        let inventory = Inventory::from_file(temp_file.path()).unwrap();
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.all()[0].location, "Bergen, Norway");
    }

    #[test]
    fn test_from_json_str_rejects_garbage() {
        assert!(matches!(
            Inventory::from_json_str("{not json"),
            Err(ScoutError::InventoryError { .. })
        ));
    }
}
