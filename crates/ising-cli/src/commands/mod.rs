//! CLI command implementations.

pub mod build;
pub mod common;
pub mod simulate;
pub mod sweep;
