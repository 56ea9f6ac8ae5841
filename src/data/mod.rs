/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  https://… .csv  /  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch / read → RawTable → drop incomplete rows → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  process-wide, loaded once, read-only Arc<Dataset>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria predicates → matching indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ pipeline  │  view + metrics + per-species means + scatter points
///   └──────────┘
/// ```

pub mod cache;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
