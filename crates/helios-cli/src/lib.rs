//! Command-line surface for the LCOE toolkit.

pub mod cli;
pub mod commands;
