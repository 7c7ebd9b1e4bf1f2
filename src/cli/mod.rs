//! Command-line interface
//!
//! Argument definitions and command handlers for the `crossconf` binary.

pub mod args;
pub mod commands;
