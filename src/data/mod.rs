/// Data layer: core types, loading, filtering, and duration analytics.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Catalog
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Catalog  │  Vec<CatalogRecord>, genre + column indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year range + tag predicates → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ analysis  │  normalized durations → mode, short-title count
///   └──────────┘
/// ```

pub mod analysis;
pub mod filter;
pub mod loader;
pub mod model;
