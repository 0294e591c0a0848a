//! Command implementations for the SADTIME CLI.
//!
//! Each subcommand is implemented in its own module.

pub mod completions;
pub mod dashboard;
pub mod status;

pub use completions::generate_completions;
pub use dashboard::run_dashboard;
pub use status::run_status;
