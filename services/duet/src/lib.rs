//! Duet Service Library Crate
//!
//! Configuration, session driving and transcript rendering for the `duet`
//! binary. The binary itself only parses arguments and wires these together.

pub mod config;
pub mod render;
pub mod runner;
