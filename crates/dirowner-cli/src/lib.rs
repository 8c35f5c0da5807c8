//! # dirowner-cli
//!
//! Command-line front end for the ownership-resolution pipeline.
//!
//! ## Modes
//!
//! - `resolve <PATH>...` extracts and resolves in one process
//! - `resolve --extract-only <PATH>...` prints the intermediate UID map
//! - `resolve --uid-map <FILE|->` resolves a map produced elsewhere
//!
//! stdout carries only the final JSON document; everything else is logged
//! to stderr.

pub mod cli;
pub mod config;
pub mod output;

pub use cli::{exit_code, run};
