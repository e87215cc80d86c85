//! CLI command implementations.

pub mod aggregate;
