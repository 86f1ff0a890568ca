use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// FieldValue – a single cell of a catalog column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the loose typing of catalog
/// exports. Used in `BTreeMap` / `BTreeSet` downstream so `FieldValue`
/// must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put FieldValue in BTreeSet --

impl Eq for FieldValue {}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use FieldValue::*;
        fn discriminant(v: &FieldValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for FieldValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FieldValue::String(s) => s.hash(state),
            FieldValue::Integer(i) => i.hash(state),
            FieldValue::Float(f) => f.to_bits().hash(state),
            FieldValue::Bool(b) => b.hash(state),
            FieldValue::Null => {}
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Null => write!(f, "<null>"),
        }
    }
}

// ---------------------------------------------------------------------------
// CatalogRecord – one row of the source catalog
// ---------------------------------------------------------------------------

/// A single catalog entry (one row of the source table).
#[derive(Debug, Clone)]
pub struct CatalogRecord {
    /// Display title.
    pub title: String,
    /// Release year, when the source row carried a usable one.
    pub release_year: Option<i32>,
    /// Raw duration cell, kept exactly as loaded ("90 min", 90, null, ...).
    /// Normalization to minutes happens in `data::analysis`, never in place.
    pub duration: FieldValue,
    /// Trimmed genre tags split out of the delimited genre column.
    pub genres: Vec<String>,
    /// Remaining metadata columns: column name → value.
    pub extra: BTreeMap<String, FieldValue>,
}

impl CatalogRecord {
    /// Whether one of the record's genre tags equals `tag` exactly.
    pub fn has_genre(&self, tag: &str) -> bool {
        self.genres.iter().any(|g| g == tag)
    }
}

// ---------------------------------------------------------------------------
// Catalog – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed catalog with pre-computed column indices.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// All records (rows) in file order.
    pub records: Vec<CatalogRecord>,
    /// Sorted set of every genre tag seen in the catalog.
    pub genre_index: BTreeSet<String>,
    /// Ordered list of extra metadata column names (excludes the
    /// title / release-year / duration / genre columns).
    pub extra_columns: Vec<String>,
    /// For each extra column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<FieldValue>>,
    /// Smallest and largest release year present, if any row has one.
    pub year_span: Option<(i32, i32)>,
}

impl Catalog {
    /// Build column indices from the loaded records.
    pub fn from_records(records: Vec<CatalogRecord>) -> Self {
        let mut genre_index: BTreeSet<String> = BTreeSet::new();
        let mut column_names_set: BTreeSet<String> = BTreeSet::new();
        let mut unique_values: BTreeMap<String, BTreeSet<FieldValue>> = BTreeMap::new();
        let mut year_span: Option<(i32, i32)> = None;

        for record in &records {
            for tag in &record.genres {
                genre_index.insert(tag.clone());
            }
            for (col, val) in &record.extra {
                column_names_set.insert(col.clone());
                unique_values
                    .entry(col.clone())
                    .or_default()
                    .insert(val.clone());
            }
            if let Some(year) = record.release_year {
                year_span = match year_span {
                    Some((min, max)) => Some((min.min(year), max.max(year))),
                    None => Some((year, year)),
                };
            }
        }

        let extra_columns: Vec<String> = column_names_set.into_iter().collect();
        Catalog {
            records,
            genre_index,
            extra_columns,
            unique_values,
            year_span,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
