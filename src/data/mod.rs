/// Data layer: core types, loading, analysis, and export.
///
/// Architecture:
/// ```text
///  Carpetview .dat / raw .log
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TaMatrix / pump samples
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ analysis  │  slices, kinetic trace, pump statistics
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  labeled traces → csv / json
///   └──────────┘
/// ```
pub mod analysis;
pub mod export;
pub mod loader;
pub mod model;
