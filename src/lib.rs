//! Per-organization KPI dashboards from CSV time series.
//!
//! Each organization's KPI table is loaded from `<data_dir>/<file_name>`,
//! paired with synthetic governance and regional tables, filtered by year
//! and date range, and condensed into metric cards, trend series and a
//! governance summary. The result is rendered as terminal text, JSON, or a
//! static HTML page.
//!
//! ```no_run
//! use kpidash::data::{CsvDirectorySource, DataStore, LoadOptions};
//! use kpidash::pipeline::{DashboardView, Selection};
//!
//! let store = DataStore::load(&CsvDirectorySource::new("data"), &LoadOptions::default());
//! let dataset = store.dataset("EUCL")?;
//! let view = DashboardView::build(dataset, &Selection::new("EUCL"))?;
//! println!("{} card(s)", view.snapshot.metrics.len());
//! # Ok::<(), kpidash::core::KpiDashError>(())
//! ```

pub mod auth;
pub mod catalog;
pub mod config;
pub mod core;
pub mod data;
pub mod pipeline;
pub mod reporting;
pub mod ui;

// Re-export commonly used items
pub use crate::core::{KpiDashError, Result};
