//! Dataset loading
//!
//! This module reads each organization's KPI table, synthesizes the
//! governance and regional tables, and memoizes the result for the
//! lifetime of the process.

pub mod cache;
pub mod loader;
pub mod store;
pub mod synth;

// Re-export commonly used items
pub use loader::{CsvDirectorySource, KpiSource, LoadedTable, read_kpi_csv};
pub use store::{DataStore, LoadOptions, OrgDataset};
pub use synth::Synthesizer;
