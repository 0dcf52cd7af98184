//! CLI module
//!
//! Argument definitions for the `gitea-admin` binary.

pub mod args;

pub use args::{Cli, Commands};
