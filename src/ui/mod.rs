//! User interface and interaction
//!
//! This module contains the CLI parser and the terminal renderers for
//! dashboard views and the organization list.

pub mod cli;
pub mod color;
pub mod output;

// Re-export commonly used items
pub use cli::{Cli, Commands, cli_to_config};
pub use output::{display_organization_list, display_view, render_view};
