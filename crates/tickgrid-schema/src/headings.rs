#![deny(unsafe_code)]

//! User heading overrides.
//!
//! Custom column headings are stored as a nested document keyed by schema
//! name then sourceless field name, so they survive column reordering and
//! schema recomposition. A field without an entry falls back to its
//! built-in heading.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Heading overrides for all schemas, persisted as pretty JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeadingOverrides {
    overrides: BTreeMap<String, BTreeMap<String, String>>,
}

impl HeadingOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads overrides from `path`. A missing file means no overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| SchemaError::io(path, source))?;
        serde_json::from_str(&contents).map_err(|source| SchemaError::json(path, source))
    }

    /// Writes the full override document to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|source| SchemaError::json(path, source))?;
        fs::write(path, json).map_err(|source| SchemaError::io(path, source))
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// The custom heading for one field, if any.
    pub fn get(&self, schema: &str, field: &str) -> Option<&str> {
        self.overrides
            .get(schema)
            .and_then(|fields| fields.get(field))
            .map(String::as_str)
    }

    pub fn set(&mut self, schema: impl Into<String>, field: impl Into<String>, heading: impl Into<String>) {
        self.overrides
            .entry(schema.into())
            .or_default()
            .insert(field.into(), heading.into());
    }

    /// Flat view over every override as `(schema, field, heading)`, in
    /// document order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.overrides.iter().flat_map(|(schema, fields)| {
            fields
                .iter()
                .map(move |(field, heading)| (schema.as_str(), field.as_str(), heading.as_str()))
        })
    }

    /// Removes one override, dropping the schema entry when it empties.
    pub fn remove(&mut self, schema: &str, field: &str) -> Option<String> {
        let fields = self.overrides.get_mut(schema)?;
        let removed = fields.remove(field);
        if fields.is_empty() {
            self.overrides.remove(schema);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_falls_back_to_none() {
        let mut overrides = HeadingOverrides::new();
        overrides.set("Security", "Last", "Last Price");
        assert_eq!(overrides.get("Security", "Last"), Some("Last Price"));
        assert_eq!(overrides.get("Security", "Bid"), None);
        assert_eq!(overrides.get("Holding", "Last"), None);
    }

    #[test]
    fn test_remove_prunes_empty_schemas() {
        let mut overrides = HeadingOverrides::new();
        overrides.set("Order", "Status", "State");
        assert_eq!(overrides.remove("Order", "Status"), Some("State".to_owned()));
        assert_eq!(overrides.remove("Order", "Status"), None);
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headings.json");

        let mut overrides = HeadingOverrides::new();
        overrides.set("Security", "Last", "Last Px");
        overrides.set("Security", "BestBid", "Bid");
        overrides.set("Holding", "Quantity", "Qty");
        overrides.save(&path).unwrap();

        let loaded = HeadingOverrides::load(&path).unwrap();
        assert_eq!(loaded, overrides);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = HeadingOverrides::load(dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_corrupt_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            HeadingOverrides::load(&path),
            Err(SchemaError::Json { .. })
        ));
    }
}
