//! Filter, derive and format
//!
//! This module turns loaded tables into what a dashboard shows: the
//! filtered rows, the metric cards with their deltas, trend series and the
//! assembled view for one selection.

pub mod currency;
pub mod filter;
pub mod metrics;
pub mod view;

// Re-export commonly used items
pub use currency::{format_currency, group_thousands};
pub use metrics::{MetricSnapshot, MetricStatus, Snapshot, TrendSeries, derive_snapshot};
pub use view::{DashboardView, Selection};
