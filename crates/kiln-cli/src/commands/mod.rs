//! Command implementations for the Kiln CLI.
//!
//! - [`plan`] - print the assembled plan as JSON
//! - [`check`] - validate declarations per mode
//! - [`rules`] - look up the rule for filenames
//!
//! Each command module provides an `execute` function taking its parsed
//! arguments.

pub mod check;
pub mod plan;
pub mod rules;

pub use check::execute as check_execute;
pub use plan::execute as plan_execute;
pub use rules::execute as rules_execute;
