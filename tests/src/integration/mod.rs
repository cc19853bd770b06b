//! Cross-crate integration scenarios.

pub mod command_path;
