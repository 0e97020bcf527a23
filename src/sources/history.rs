use crate::model::ComponentKey;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Ordered launch history, most recently launched first.
///
/// The list engine consumes entries during its merge pass and writes the
/// pruned remainder back via `replace`; launches are recorded at the front.
/// Persistence is explicit: the host saves when `is_dirty` reports a change.
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct History {
    recents: Vec<ComponentKey>,
    #[serde(skip)]
    dirty: bool,
}

impl History {
    #[allow(dead_code)]
    pub fn new(recents: Vec<ComponentKey>) -> Self {
        Self { recents, dirty: false }
    }

    /// The recorded keys, most recent first.
    pub fn keys(&self) -> &[ComponentKey] {
        &self.recents
    }

    /// Swaps in a pruned copy of the sequence. No-op when nothing changed.
    pub fn replace(&mut self, recents: Vec<ComponentKey>) {
        if self.recents != recents {
            self.recents = recents;
            self.dirty = true;
        }
    }

    /// Moves `key` to the front, dropping any older occurrence and anything
    /// beyond `cap`.
    pub fn record_launch(&mut self, key: ComponentKey, cap: usize) {
        self.recents.retain(|k| *k != key);
        self.recents.insert(0, key);
        self.recents.truncate(cap);
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

pub fn history_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "drawer", "drawer").map(|dirs| {
        let data_dir = dirs.data_dir();
        let _ = fs::create_dir_all(data_dir);
        data_dir.join("history.json")
    })
}

pub fn load() -> History {
    match history_path() {
        Some(path) => load_from(&path),
        None => History::default(),
    }
}

/// Best effort: a missing or corrupt file yields an empty history.
pub fn load_from(path: &Path) -> History {
    if let Ok(content) = fs::read_to_string(path) {
        if let Ok(history) = serde_json::from_str(&content) {
            return history;
        }
        log::warn!("ignoring unreadable history at {:?}", path);
    }
    History::default()
}

pub fn save(history: &History) -> Result<()> {
    if let Some(path) = history_path() {
        save_to(&path, history)?;
    }
    Ok(())
}

pub fn save_to(path: &Path, history: &History) -> Result<()> {
    let content = serde_json::to_string_pretty(history)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(id: &str) -> ComponentKey {
        ComponentKey::new(id)
    }

    #[test]
    fn test_record_launch_moves_to_front_and_dedups() {
        let mut history = History::new(vec![key("a"), key("b"), key("c")]);
        history.record_launch(key("c"), 10);
        assert_eq!(history.keys(), &[key("c"), key("a"), key("b")]);
        assert!(history.is_dirty());
    }

    #[test]
    fn test_record_launch_respects_cap() {
        let mut history = History::default();
        for id in ["a", "b", "c", "d"] {
            history.record_launch(key(id), 3);
        }
        assert_eq!(history.keys(), &[key("d"), key("c"), key("b")]);
    }

    #[test]
    fn test_replace_only_marks_dirty_on_change() {
        let mut history = History::new(vec![key("a"), key("b")]);
        history.replace(vec![key("a"), key("b")]);
        assert!(!history.is_dirty());
        history.replace(vec![key("b")]);
        assert!(history.is_dirty());
        assert_eq!(history.keys(), &[key("b")]);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut history = History::default();
        history.record_launch(key("files.desktop"), 10);
        history.record_launch(key("firefox.desktop"), 10);
        save_to(&path, &history).unwrap();

        let loaded = load_from(&path);
        assert_eq!(loaded.keys(), &[key("firefox.desktop"), key("files.desktop")]);
        assert!(!loaded.is_dirty());
    }

    #[test]
    fn test_load_tolerates_missing_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(load_from(&missing).keys().is_empty());

        let corrupt = dir.path().join("bad.json");
        fs::write(&corrupt, "{not json").unwrap();
        assert!(load_from(&corrupt).keys().is_empty());
    }
}
