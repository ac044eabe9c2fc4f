/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TransactionTable (loaded once)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date range + payment type → new TransactionTable
///   └──────────┘
///        │
///        ▼
///   ┌────────────────────────────┐
///   │ aggregate / stats           │  top cities, payment distribution,
///   │                             │  customer buckets, describe()
///   └────────────────────────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
