//! Subcommand implementations.

pub mod bench;
pub mod empty;
pub mod exact;
pub mod find;
pub mod info;
