use crate::catalog::AppCatalog;
use crate::model::ComponentKey;
use log::debug;
use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Matcher, Utf32Str};

const MAX_SUGGESTIONS: usize = 3;

/// What a query produced: the ranked filter for the list, plus follow-up
/// query suggestions for apps whose display name missed but whose command
/// matched (e.g. "naut" for Files/nautilus).
pub struct SearchOutcome {
    pub apps: Vec<ComponentKey>,
    pub suggestions: Vec<String>,
}

pub struct AppSearcher {
    matcher: Matcher,
}

impl Default for AppSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AppSearcher {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
        }
    }

    pub fn search(&mut self, query: &str, catalog: &AppCatalog) -> SearchOutcome {
        let pattern = Pattern::parse(query, CaseMatching::Smart, Normalization::Smart);

        let mut buf = Vec::new();
        let mut scored: Vec<(i64, &ComponentKey, &str)> = Vec::new();
        let mut near: Vec<(i64, &str)> = Vec::new();

        for record in catalog.records() {
            let name = Utf32Str::new(&record.name, &mut buf);
            if let Some(score) = pattern.score(name, &mut self.matcher) {
                scored.push((score as i64, &record.key, &record.name));
                continue;
            }
            let stem = command_stem(&record.exec);
            let haystack = Utf32Str::new(stem, &mut buf);
            if let Some(score) = pattern.score(haystack, &mut self.matcher) {
                near.push((score as i64, &record.name));
            }
        }

        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.2.cmp(b.2)));
        near.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));

        let apps: Vec<ComponentKey> = scored.into_iter().map(|(_, key, _)| key.clone()).collect();
        let suggestions: Vec<String> = near
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, name)| name.to_string())
            .collect();

        debug!(
            "AppSearcher: query={:?}, matches={}, suggestions={}",
            query,
            apps.len(),
            suggestions.len()
        );
        SearchOutcome { apps, suggestions }
    }
}

/// First token of the launch command, without its directory part.
fn command_stem(exec: &str) -> &str {
    let first = exec.split_whitespace().next().unwrap_or(exec);
    first.rsplit('/').next().unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AppRecord;

    fn catalog_of(records: &[(&str, &str, &str)]) -> AppCatalog {
        let mut catalog = AppCatalog::new();
        catalog.set_records(
            records
                .iter()
                .map(|(id, name, exec)| {
                    AppRecord::new(ComponentKey::new(*id), name.to_string(), exec.to_string())
                })
                .collect(),
        );
        catalog
    }

    #[test]
    fn test_search_matches_by_display_name() {
        let catalog = catalog_of(&[
            ("firefox.desktop", "Firefox", "firefox"),
            ("files.desktop", "Files", "nautilus"),
            ("term.desktop", "Terminal", "foot"),
        ]);
        let mut searcher = AppSearcher::new();

        let outcome = searcher.search("term", &catalog);
        assert_eq!(outcome.apps, vec![ComponentKey::new("term.desktop")]);
    }

    #[test]
    fn test_search_prefers_tighter_matches() {
        let catalog = catalog_of(&[
            ("fireworks.desktop", "Fireworks Editor", "fireworks"),
            ("firefox.desktop", "Firefox", "firefox"),
        ]);
        let mut searcher = AppSearcher::new();

        let outcome = searcher.search("firefox", &catalog);
        assert_eq!(outcome.apps, vec![ComponentKey::new("firefox.desktop")]);
    }

    #[test]
    fn test_command_match_becomes_suggestion() {
        let catalog = catalog_of(&[
            ("files.desktop", "Files", "nautilus --new-window"),
            ("term.desktop", "Terminal", "foot"),
        ]);
        let mut searcher = AppSearcher::new();

        let outcome = searcher.search("naut", &catalog);
        assert!(outcome.apps.is_empty());
        assert_eq!(outcome.suggestions, vec!["Files".to_string()]);
    }

    #[test]
    fn test_no_match_yields_nothing() {
        let catalog = catalog_of(&[("files.desktop", "Files", "nautilus")]);
        let mut searcher = AppSearcher::new();

        let outcome = searcher.search("xyzzy", &catalog);
        assert!(outcome.apps.is_empty());
        assert!(outcome.suggestions.is_empty());
    }

    #[test]
    fn test_command_stem_strips_path_and_args() {
        assert_eq!(command_stem("/usr/bin/nautilus --new-window"), "nautilus");
        assert_eq!(command_stem("foot"), "foot");
    }
}
