use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of an installed application (the desktop entry id,
/// e.g. "firefox.desktop"). Search layers and the usage history speak in
/// keys so they never have to hold records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentKey(String);

impl ComponentKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentKey {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One installed application as published by the catalog. Immutable once
/// published; the catalog replaces records wholesale on update.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRecord {
    pub key: ComponentKey,
    pub name: String,          // Display name
    pub exec: String,          // Executable command
    pub icon: Option<String>,  // Icon name/path
    pub open_in_terminal: bool,
}

impl AppRecord {
    pub fn new(key: ComponentKey, name: String, exec: String) -> Self {
        Self {
            key,
            name,
            exec,
            icon: None,
            open_in_terminal: false,
        }
    }
}

/// One renderable unit in the list produced by `AppsList`. Rebuilt wholesale
/// on every recompute; no item survives across rebuilds.
///
/// `position` is the absolute index in the produced sequence. Only `App`
/// entries take part in row/column packing; `row`/`col` stay 0 until the
/// packing pass assigns them.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterItem {
    App {
        position: usize,
        record: AppRecord,
        /// Index among app entries only, ignoring dividers and markers.
        app_index: usize,
        row: usize,
        col: usize,
    },
    /// Separates the match section from the market-search row.
    SectionDivider { position: usize },
    /// Shown instead of a divider when a search matched nothing.
    EmptySearch { position: usize },
    /// Offers to take the query to the software store.
    MarketSearch { position: usize },
    /// A follow-up query proposed by the search provider.
    Suggestion { position: usize, query: String },
}

#[allow(dead_code)]
impl AdapterItem {
    pub fn position(&self) -> usize {
        match self {
            AdapterItem::App { position, .. }
            | AdapterItem::SectionDivider { position }
            | AdapterItem::EmptySearch { position }
            | AdapterItem::MarketSearch { position }
            | AdapterItem::Suggestion { position, .. } => *position,
        }
    }

    pub fn is_app(&self) -> bool {
        matches!(self, AdapterItem::App { .. })
    }

    /// Divider-class items reset the running section count during packing.
    pub fn is_section_break(&self) -> bool {
        matches!(
            self,
            AdapterItem::SectionDivider { .. }
                | AdapterItem::EmptySearch { .. }
                | AdapterItem::MarketSearch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_key_display() {
        let key = ComponentKey::new("firefox.desktop");
        assert_eq!(key.to_string(), "firefox.desktop");
        assert_eq!(key.as_str(), "firefox.desktop");
    }

    #[test]
    fn test_position_accessor_covers_all_variants() {
        let record = AppRecord::new(ComponentKey::new("a"), "a".into(), "a".into());
        let items = [
            AdapterItem::App { position: 0, record, app_index: 0, row: 0, col: 0 },
            AdapterItem::SectionDivider { position: 1 },
            AdapterItem::EmptySearch { position: 2 },
            AdapterItem::MarketSearch { position: 3 },
            AdapterItem::Suggestion { position: 4, query: "q".into() },
        ];
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item.position(), i);
        }
    }

    #[test]
    fn test_section_break_classification() {
        assert!(AdapterItem::SectionDivider { position: 0 }.is_section_break());
        assert!(AdapterItem::EmptySearch { position: 0 }.is_section_break());
        assert!(AdapterItem::MarketSearch { position: 0 }.is_section_break());
        assert!(!AdapterItem::Suggestion { position: 0, query: String::new() }.is_section_break());
    }
}
