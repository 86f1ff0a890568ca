use std::collections::{BTreeMap, BTreeSet};

use super::model::{Catalog, CatalogRecord, FieldValue};

// ---------------------------------------------------------------------------
// Year range
// ---------------------------------------------------------------------------

/// Inclusive release-year bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    /// The 1990s, both ends inclusive.
    pub const NINETIES: YearRange = YearRange {
        min: 1990,
        max: 1999,
    };

    /// Whether `year` lies inside the range.
    pub fn contains(&self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }
}

/// Keep the records released inside `range`, in input order.
///
/// Records without a usable release year are treated as out of range.
pub fn filter_by_year_range(records: &[CatalogRecord], range: YearRange) -> Vec<&CatalogRecord> {
    records
        .iter()
        .filter(|r| r.release_year.is_some_and(|y| range.contains(y)))
        .collect()
}

// ---------------------------------------------------------------------------
// Filter state: which subset of the catalog is visible
// ---------------------------------------------------------------------------

/// Everything the side panel can constrain.
#[derive(Debug, Clone)]
pub struct FilterState {
    /// Inclusive release-year window.
    pub years: YearRange,
    /// Selected genre tags. Selecting every known tag disables the
    /// constraint; an empty selection hides everything.
    pub genres: BTreeSet<String>,
    /// Per-column value selections for the extra metadata columns, with
    /// the same all-selected / none-selected semantics as `genres`.
    pub columns: BTreeMap<String, BTreeSet<FieldValue>>,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            years: YearRange::NINETIES,
            genres: BTreeSet::new(),
            columns: BTreeMap::new(),
        }
    }
}

/// Initialise a [`FilterState`] that shows the whole catalog.
pub fn init_filter_state(catalog: &Catalog) -> FilterState {
    FilterState {
        years: catalog
            .year_span
            .map(|(min, max)| YearRange { min, max })
            .unwrap_or(YearRange::NINETIES),
        genres: catalog.genre_index.clone(),
        columns: catalog.unique_values.clone(),
    }
}

/// Return indices of records that pass all active filters, in file order.
///
/// A record passes when:
/// * its release year is present and inside `years`
/// * the genre filter is inactive (all tags selected), or one of the
///   record's tags is selected; with a partial selection a record with no
///   tags fails, and with an empty selection everything fails
/// * for each extra column: all values selected → no constraint, empty
///   selection → fails, missing cell → passes only when `Null` is selected
pub fn filtered_indices(catalog: &Catalog, filters: &FilterState) -> Vec<usize> {
    catalog
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| record_passes(catalog, filters, record))
        .map(|(i, _)| i)
        .collect()
}

fn record_passes(catalog: &Catalog, filters: &FilterState, record: &CatalogRecord) -> bool {
    if !record
        .release_year
        .is_some_and(|y| filters.years.contains(y))
    {
        return false;
    }

    if filters.genres.len() != catalog.genre_index.len() {
        if filters.genres.is_empty() {
            return false;
        }
        if !record.genres.iter().any(|g| filters.genres.contains(g)) {
            return false;
        }
    }

    for (column, selected) in &filters.columns {
        if selected.is_empty() {
            // Nothing selected for this column → hide everything
            return false;
        }
        // Check all unique values are selected → no effective filter
        if let Some(all_values) = catalog.unique_values.get(column) {
            if selected.len() == all_values.len() {
                continue;
            }
        }
        match record.extra.get(column) {
            Some(value) => {
                if !selected.contains(value) {
                    return false;
                }
            }
            None => {
                // record doesn't have this column → include only if Null is selected
                if !selected.contains(&FieldValue::Null) {
                    return false;
                }
            }
        }
    }
    true
}
