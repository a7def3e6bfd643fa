//! Core types and foundational components
//!
//! This module contains the table types, error handling,
//! and constants used throughout the application.

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items for convenience
pub use error::{KpiDashError, Result};
pub use types::{
    AuditOpinion, DateRange, GovernanceRow, GovernanceTable, KpiRow, KpiTable, RegionalRow,
    RegionalTable, YearSelection,
};
