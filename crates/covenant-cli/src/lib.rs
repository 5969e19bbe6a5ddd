//! covenant-cli - Command-line interface for covenant.
//!
//! Wires a filesystem document store, the compiled-in format parsers and
//! the configured model provider into a [`covenant_core::DocumentService`]
//! and exposes its operations as subcommands.

pub mod cli;
pub mod commands;
pub mod factory;

pub use cli::{Cli, Command};
pub use commands::Output;
pub use factory::{create_service, load_config};
