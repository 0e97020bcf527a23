use crate::model::{AppRecord, ComponentKey};
use std::collections::{HashMap, HashSet};

/// Source of truth for all known app records.
///
/// Records are published in one batch and exposed in a stable order: sorted
/// case-insensitively by display name, key as tie-break. Duplicate keys keep
/// the first occurrence, so earlier scan roots shadow later ones.
#[derive(Debug, Default)]
pub struct AppCatalog {
    records: Vec<AppRecord>,
    index: HashMap<ComponentKey, usize>,
}

impl AppCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_records(&mut self, mut records: Vec<AppRecord>) {
        let mut seen = HashSet::new();
        records.retain(|record| seen.insert(record.key.clone()));
        records.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.key.as_str().cmp(b.key.as_str()))
        });
        self.index = records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.key.clone(), i))
            .collect();
        self.records = records;
    }

    /// All records, in catalog order.
    pub fn records(&self) -> &[AppRecord] {
        &self.records
    }

    pub fn resolve(&self, key: &ComponentKey) -> Option<&AppRecord> {
        self.index.get(key).map(|&i| &self.records[i])
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> AppRecord {
        AppRecord::new(ComponentKey::new(id), name.to_string(), id.to_string())
    }

    #[test]
    fn test_records_sorted_by_name() {
        let mut catalog = AppCatalog::new();
        catalog.set_records(vec![
            record("term.desktop", "Terminal"),
            record("files.desktop", "files"),
            record("browser.desktop", "Browser"),
        ]);
        let names: Vec<&str> = catalog.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Browser", "files", "Terminal"]);
    }

    #[test]
    fn test_resolve_by_key() {
        let mut catalog = AppCatalog::new();
        catalog.set_records(vec![record("a.desktop", "A"), record("b.desktop", "B")]);
        let key = ComponentKey::new("b.desktop");
        assert_eq!(catalog.resolve(&key).map(|r| r.name.as_str()), Some("B"));
        assert!(catalog.resolve(&ComponentKey::new("missing.desktop")).is_none());
    }

    #[test]
    fn test_duplicate_keys_keep_first_occurrence() {
        let mut catalog = AppCatalog::new();
        catalog.set_records(vec![
            record("app.desktop", "User copy"),
            record("app.desktop", "System copy"),
        ]);
        assert_eq!(catalog.len(), 1);
        let key = ComponentKey::new("app.desktop");
        assert_eq!(catalog.resolve(&key).map(|r| r.name.as_str()), Some("User copy"));
    }

    #[test]
    fn test_replacing_records_rebuilds_index() {
        let mut catalog = AppCatalog::new();
        catalog.set_records(vec![record("a.desktop", "A")]);
        catalog.set_records(vec![record("b.desktop", "B")]);
        assert!(catalog.resolve(&ComponentKey::new("a.desktop")).is_none());
        assert!(catalog.resolve(&ComponentKey::new("b.desktop")).is_some());
        assert_eq!(catalog.len(), 1);
    }
}
