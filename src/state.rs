use crate::color::GenreColors;
use crate::data::analysis::{DurationStats, DEFAULT_SHORT_GENRE, SHORT_RUNTIME_CUTOFF_MIN};
use crate::data::filter::{filtered_indices, init_filter_state, FilterState, YearRange};
use crate::data::model::{Catalog, CatalogRecord};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded catalog (None until the user opens a file).
    pub catalog: Option<Catalog>,

    /// Current filter selections.
    pub filters: FilterState,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Duration statistics over the visible records; None when no visible
    /// record has a usable duration.
    pub stats: Option<DurationStats>,

    /// Genre tag fed to the short-title counter.
    pub short_genre: String,

    /// Runtime cutoff (minutes) for the short-title counter.
    pub short_cutoff: u32,

    /// Histogram bin width in minutes.
    pub bin_width: u32,

    /// Genre tag colours for the side panel.
    pub genre_colors: Option<GenreColors>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,

    /// Whether the record table panel is shown.
    pub show_table: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            catalog: None,
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            stats: None,
            short_genre: DEFAULT_SHORT_GENRE.to_string(),
            short_cutoff: SHORT_RUNTIME_CUTOFF_MIN,
            bin_width: 10,
            genre_colors: None,
            status_message: None,
            loading: false,
            show_table: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded catalog, initialise filters and colours.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.filters = init_filter_state(&catalog);
        self.genre_colors = Some(GenreColors::new(&catalog.genre_index));

        // Keep the short-title genre meaningful for this dataset.
        if !catalog.genre_index.contains(&self.short_genre) {
            if let Some(first) = catalog.genre_index.first() {
                self.short_genre = first.clone();
            }
        }

        self.catalog = Some(catalog);
        self.status_message = None;
        self.loading = false;
        self.refilter();
    }

    /// Recompute `visible_indices` and the duration statistics after a
    /// filter change.
    pub fn refilter(&mut self) {
        let Some(catalog) = &self.catalog else {
            self.visible_indices.clear();
            self.stats = None;
            return;
        };

        self.visible_indices = filtered_indices(catalog, &self.filters);

        let visible: Vec<&CatalogRecord> = self
            .visible_indices
            .iter()
            .map(|&i| &catalog.records[i])
            .collect();

        // An empty sample set is a valid outcome (reported as "no data"),
        // not a failure.
        self.stats =
            DurationStats::compute(&visible, &self.short_genre, self.short_cutoff).ok();
    }

    /// Snap the year filter to the 1990s.
    pub fn focus_nineties(&mut self) {
        self.filters.years = YearRange::NINETIES;
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::FieldValue;
    use std::collections::BTreeMap;

    fn record(year: Option<i32>, duration: &str, genres: &[&str]) -> CatalogRecord {
        CatalogRecord {
            title: String::new(),
            release_year: year,
            duration: if duration.is_empty() {
                FieldValue::Null
            } else {
                FieldValue::String(duration.to_string())
            },
            genres: genres.iter().map(|g| g.to_string()).collect(),
            extra: BTreeMap::new(),
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        state.set_catalog(Catalog::from_records(vec![
            record(Some(1995), "90 min", &["Action"]),
            record(Some(1995), "95 min", &["Action"]),
            record(Some(1995), "90 min", &["Dramas"]),
            record(Some(2005), "90 min", &["Action"]),
        ]));
        state
    }

    #[test]
    fn set_catalog_computes_stats_over_everything() {
        let state = loaded_state();
        assert_eq!(state.visible_indices, vec![0, 1, 2, 3]);
        let stats = state.stats.as_ref().unwrap();
        assert_eq!(stats.most_frequent, 90);
        assert_eq!(stats.samples.len(), 4);
        assert_eq!(stats.short_count, 2);
    }

    #[test]
    fn focus_nineties_narrows_the_view() {
        let mut state = loaded_state();
        state.focus_nineties();
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        let stats = state.stats.as_ref().unwrap();
        assert_eq!(stats.most_frequent, 90);
        assert_eq!(stats.short_count, 1);
    }

    #[test]
    fn stats_go_missing_when_no_duration_parses() {
        let mut state = AppState::default();
        state.set_catalog(Catalog::from_records(vec![
            record(Some(1995), "", &["Action"]),
            record(Some(1995), "tbd", &["Action"]),
        ]));
        assert_eq!(state.visible_indices.len(), 2);
        assert!(state.stats.is_none());
    }

    #[test]
    fn short_genre_falls_back_to_first_known_tag() {
        let mut state = AppState::default();
        state.set_catalog(Catalog::from_records(vec![record(
            Some(1995),
            "90 min",
            &["Dramas"],
        )]));
        assert_eq!(state.short_genre, "Dramas");
    }

    #[test]
    fn refilter_without_catalog_clears_the_view() {
        let mut state = AppState::default();
        state.refilter();
        assert!(state.visible_indices.is_empty());
        assert!(state.stats.is_none());
    }
}
