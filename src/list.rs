use crate::catalog::AppCatalog;
use crate::model::{AdapterItem, AppRecord, ComponentKey};
use crate::sources::history::History;
use log::debug;

/// Called after every completed rebuild with the fresh item sequence and row
/// count. The listener gets borrowed views only, so it has no path back into
/// the setters and cannot re-trigger a rebuild from inside one.
pub type ChangeListener = Box<dyn FnMut(&[AdapterItem], usize)>;

/// The usage-ordered apps list behind the drawer surface.
///
/// Owns the merge/filter/layout pipeline: recently launched apps are merged
/// with the catalog into a row of at most `columns` entries, an optional
/// ranked search filter replaces that row while present, and the result is
/// flattened into positionally-indexed adapter items with row/column
/// assignments. Each trigger (catalog update, filter change, suggestion
/// change) runs the whole pipeline as one recomputation and notifies once.
///
/// Catalog and history are borrowed per call; the engine keeps no reference
/// to either between rebuilds.
pub struct AppsList {
    columns: usize,
    // Recents-merged catalog subset, at most `columns` entries
    apps: Vec<AppRecord>,
    // The subset actually emitted, after filter resolution
    filtered: Vec<AppRecord>,
    items: Vec<AdapterItem>,
    // Ranked search matches; Some([]) is a live search with no hits,
    // which is a different state from None
    search_results: Option<Vec<ComponentKey>>,
    suggestions: Option<Vec<String>>,
    row_count: usize,
    listener: Option<ChangeListener>,
}

impl AppsList {
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            apps: Vec::new(),
            filtered: Vec::new(),
            items: Vec::new(),
            search_results: None,
            suggestions: None,
            row_count: 0,
            listener: None,
        }
    }

    pub fn set_change_listener(&mut self, listener: ChangeListener) {
        self.listener = Some(listener);
    }

    /// The current adapter items, valid until the next rebuild.
    pub fn items(&self) -> &[AdapterItem] {
        &self.items
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// The merged catalog-mode subset (recents first, catalog padding after).
    #[allow(dead_code)]
    pub fn apps(&self) -> &[AppRecord] {
        &self.apps
    }

    /// The records currently emitted as app entries, in emission order.
    pub fn filtered_apps(&self) -> &[AppRecord] {
        &self.filtered
    }

    #[allow(dead_code)]
    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn has_filter(&self) -> bool {
        self.search_results.is_some()
    }

    pub fn has_no_filtered_results(&self) -> bool {
        self.has_filter() && self.filtered.is_empty()
    }

    /// Recomputes everything from the current inputs. The host calls this on
    /// every catalog or history change; the setters below call it themselves.
    pub fn on_apps_updated(&mut self, catalog: &AppCatalog, history: &mut History) {
        self.merge(catalog, history);
        self.refill_items(catalog);
        self.notify();
    }

    /// Installs or clears the ranked search filter. Returns whether the
    /// effective filter changed; re-setting an equal value is a no-op that
    /// triggers no rebuild and no notification.
    pub fn set_search_results(
        &mut self,
        results: Option<Vec<ComponentKey>>,
        catalog: &AppCatalog,
        history: &mut History,
    ) -> bool {
        if self.search_results == results {
            return false;
        }
        self.search_results = results;
        self.on_apps_updated(catalog, history);
        true
    }

    /// Installs or clears the suggestion overlay. Same change-detection
    /// contract as `set_search_results`.
    pub fn set_suggestions(
        &mut self,
        suggestions: Option<Vec<String>>,
        catalog: &AppCatalog,
        history: &mut History,
    ) -> bool {
        if self.suggestions == suggestions {
            return false;
        }
        self.suggestions = suggestions;
        self.on_apps_updated(catalog, history);
        true
    }

    /// Merge stage: recently launched apps first, then catalog-order padding,
    /// capped at one row. Resolved recents are consumed out of the history;
    /// unresolvable ones stay for a later retry. The pruned copy is swapped
    /// back at most once, and only when something was consumed.
    fn merge(&mut self, catalog: &AppCatalog, history: &mut History) {
        self.apps.clear();

        let mut remaining = Vec::with_capacity(history.keys().len());
        let mut consumed = false;
        for key in history.keys() {
            if self.apps.len() >= self.columns {
                remaining.push(key.clone());
                continue;
            }
            match catalog.resolve(key) {
                Some(record) => {
                    self.apps.push(record.clone());
                    consumed = true;
                }
                None => remaining.push(key.clone()),
            }
        }

        for record in catalog.records() {
            if self.apps.len() >= self.columns {
                break;
            }
            if self.apps.iter().any(|app| app.key == record.key) {
                continue;
            }
            self.apps.push(record.clone());
        }

        if consumed {
            history.replace(remaining);
        }
    }

    /// Filter resolution: the active subset is the merged row in catalog
    /// mode, or the resolvable filter keys in ranking order while searching.
    /// Either way the subset is capped at one row's worth of entries.
    fn active_subset(&self, catalog: &AppCatalog) -> Vec<AppRecord> {
        match &self.search_results {
            None => self.apps.iter().take(self.columns).cloned().collect(),
            Some(keys) => {
                let mut subset = Vec::new();
                for key in keys {
                    if subset.len() >= self.columns {
                        break;
                    }
                    if let Some(record) = catalog.resolve(key) {
                        subset.push(record.clone());
                    }
                }
                subset
            }
        }
    }

    fn refill_items(&mut self, catalog: &AppCatalog) {
        let mut position = 0;
        let mut app_index = 0;

        self.filtered = self.active_subset(catalog);
        self.items.clear();

        for record in &self.filtered {
            self.items.push(AdapterItem::App {
                position,
                record: record.clone(),
                app_index,
                row: 0,
                col: 0,
            });
            position += 1;
            app_index += 1;
        }

        if self.has_filter() {
            if self.has_no_filtered_results() {
                self.items.push(AdapterItem::EmptySearch { position });
            } else {
                self.items.push(AdapterItem::SectionDivider { position });
            }
            position += 1;
            self.items.push(AdapterItem::MarketSearch { position });
            position += 1;

            // Suggestions trail the sequence; where they render is the
            // consumer's choice, sequence order is the contract.
            if let Some(suggestions) = &self.suggestions {
                for suggestion in suggestions {
                    self.items.push(AdapterItem::Suggestion {
                        position,
                        query: suggestion.clone(),
                    });
                    position += 1;
                }
            }
        }

        self.assign_rows();
        debug!(
            "AppsList: {} items, {} rows, filter={}",
            self.items.len(),
            self.row_count,
            self.has_filter()
        );
    }

    /// Packing pass: app entries fill rows of `columns`; divider-class items
    /// reset the section count so a following section starts a fresh row.
    /// Suggestions are full-width and stay out of the counters.
    fn assign_rows(&mut self) {
        if self.columns == 0 {
            self.row_count = 0;
            return;
        }
        let mut apps_in_section = 0;
        let mut apps_in_row = 0;
        let mut row_index: i32 = -1;
        for item in &mut self.items {
            if item.is_section_break() {
                apps_in_section = 0;
            } else if let AdapterItem::App { row, col, .. } = item {
                if apps_in_section % self.columns == 0 {
                    apps_in_row = 0;
                    row_index += 1;
                }
                *row = row_index as usize;
                *col = apps_in_row;
                apps_in_section += 1;
                apps_in_row += 1;
            }
        }
        self.row_count = (row_index + 1) as usize;
    }

    fn notify(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.items, self.row_count);
        }
    }
}
