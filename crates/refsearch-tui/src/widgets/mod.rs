//! Ratatui widgets for the refsearch TUI.

pub mod command_bar;
pub mod help;
pub mod query_bar;
pub mod results_table;
pub mod status_bar;
