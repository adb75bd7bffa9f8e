//! CLI command implementations.
//!
//! Each command returns the process exit code on success.

pub mod run;
pub mod template;
pub mod tests;
