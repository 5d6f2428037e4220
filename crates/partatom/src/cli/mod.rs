//! CLI command implementations.
//!
//! Each command module owns an `Args` struct and a `run()` entry point; the
//! binary in `main.rs` only does argument wiring and logging setup.

pub mod analyze;
pub mod extract;
pub mod info;
pub mod output;
pub mod validate;
