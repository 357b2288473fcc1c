//! Engine configuration and its start-up loading.
//!
//! Compiled defaults are always present; `config/lattice.json` overrides them
//! field by field when it loads.

/// Configuration types, defaults and sanitising.
pub mod lattice_config;

/// Loads the JSON configuration during `AppState::Loading`.
pub mod config_loader;
