//! cloudcontrol-cli
//!
//! Config loading and subcommand bodies for the `cloudcontrol` binary.

pub mod commands;
pub mod config;
