//! Health data aggregator CLI library.
//!
//! This crate provides the command-line pipeline around `ha-core`.

mod cli;
pub mod commands;
mod config;
pub mod display;
pub mod failure;

pub use cli::{Cli, PolicyArg, Sections};
pub use config::Config;
