//! cloudir CLI library
//!
//! Drives the provider from a YAML manifest and a local JSON state file.
//! The binary in `main.rs` is a thin clap wrapper around [`commands`].

pub mod commands;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod state;
