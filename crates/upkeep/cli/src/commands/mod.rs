//! Subcommand implementations

pub mod replay;
pub mod simulate;
