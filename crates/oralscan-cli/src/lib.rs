//! oralscan-cli library root.
//!
//! Exposes the config layer and command implementations so integration
//! tests can exercise them without spawning the binary.

pub mod commands;
pub mod config;
pub mod wiring;
