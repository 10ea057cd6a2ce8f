/// Data layer: tables, per-format parsing, and directory discovery.
///
/// Architecture:
/// ```text
///  dir/inflammation*.{csv,json,parquet}
///        │
///        ▼
///   ┌────────────┐
///   │   source    │  glob the directory → TableIter (lazy)
///   └────────────┘
///        │  one file per next()
///        ▼
///   ┌────────────┐
///   │   loader    │  parse file → Table
///   └────────────┘
///        │
///        ▼
///   ┌────────────┐
///   │   model     │  patients × days, f64
///   └────────────┘
/// ```
///
/// `writer` produces the same layouts `loader` reads.

pub mod loader;
pub mod model;
pub mod source;
pub mod writer;
