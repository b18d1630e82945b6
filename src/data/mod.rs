/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → EvalDataset (or DataSourceError)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ EvalDataset  │  Vec<EvalRecord>, derived bounds, immutable
///   └─────────────┘
///        │
///        ├──────────────────────────┐
///        ▼                          ▼
///   ┌──────────┐              ┌──────────┐
///   │  filter   │              │  stats    │
///   │ FilterSpec│→ row indices │ describe, │→ presentation data
///   └──────────┘              │ histogram │
///                             └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
pub mod stats;
