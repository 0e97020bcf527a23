use crate::model::{AppRecord, ComponentKey};
use crate::sources::Source;
use anyhow::Result;
use directories::BaseDirs;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Scans XDG application directories for desktop entries.
///
/// Directories are walked in precedence order; the catalog keeps the first
/// record per key, so user entries shadow system ones.
pub struct DesktopSource;

impl Source for DesktopSource {
    fn scan(&self) -> Result<Vec<AppRecord>> {
        let mut records = Vec::new();

        for dir in application_dirs() {
            if !dir.is_dir() {
                continue;
            }
            debug!("scanning desktop entries in {:?}", dir);
            for entry in WalkDir::new(&dir)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if !entry.file_type().is_file()
                    || path.extension().and_then(|s| s.to_str()) != Some("desktop")
                {
                    continue;
                }
                let Ok(content) = fs::read_to_string(path) else {
                    continue;
                };
                let id = desktop_id(&dir, path);
                if let Some(record) = parse_desktop_entry(&id, &content) {
                    records.push(record);
                }
            }
        }

        info!("DesktopSource: found {} entries", records.len());
        Ok(records)
    }
}

fn application_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(base_dirs) = BaseDirs::new() {
        dirs.push(base_dirs.data_dir().join("applications"));
    }
    dirs.push(Path::new("/usr/share/applications").to_path_buf());
    dirs.push(Path::new("/usr/local/share/applications").to_path_buf());
    dirs
}

/// The desktop-id: the path relative to its scan root with `/` mapped to `-`,
/// e.g. `kde/org.kde.dolphin.desktop` -> `kde-org.kde.dolphin.desktop`.
fn desktop_id(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) => relative.to_string_lossy().replace('/', "-"),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}

fn parse_desktop_entry(id: &str, content: &str) -> Option<AppRecord> {
    let mut name = None;
    let mut exec = None;
    let mut icon = None;
    let mut terminal = false;
    let mut hidden = false;
    let mut in_desktop_entry = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line == "[Desktop Entry]" {
            in_desktop_entry = true;
            continue;
        }
        if line.starts_with('[') {
            in_desktop_entry = false;
            continue;
        }
        if !in_desktop_entry {
            continue;
        }

        if let Some(value) = line.strip_prefix("Name=") {
            name = Some(value.to_string());
        } else if let Some(value) = line.strip_prefix("Exec=") {
            // Drop %f/%u style field codes; the command is launched bare.
            let clean: String = value
                .split_whitespace()
                .filter(|part| !part.starts_with('%'))
                .collect::<Vec<_>>()
                .join(" ");
            exec = Some(clean);
        } else if let Some(value) = line.strip_prefix("Icon=") {
            icon = Some(value.to_string());
        } else if let Some(value) = line.strip_prefix("Terminal=") {
            terminal = value == "true";
        } else if let Some(value) = line.strip_prefix("NoDisplay=") {
            hidden |= value == "true";
        } else if let Some(value) = line.strip_prefix("Hidden=") {
            hidden |= value == "true";
        }
    }

    if hidden {
        return None;
    }

    match (name, exec) {
        (Some(name), Some(exec)) => {
            let mut record = AppRecord::new(ComponentKey::new(id), name, exec);
            record.icon = icon;
            record.open_in_terminal = terminal;
            Some(record)
        }
        _ => None,
    }
}
