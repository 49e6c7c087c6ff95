// src/config/mod.rs

//! Configuration loading and validation for tidyrun.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Merge it with CLI flags and validate the result (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_from_path, load_settings, load_settings_with};
pub use model::{ConfigFile, RunSection, RunSettings};
pub use validate::resolve_settings;
