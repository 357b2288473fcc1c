//! Shared limits and render settings for the lattice render engine.

/// Lattice request bounds and instance buffer sizing.
pub mod lattice;

/// Colours, line widths and overlay sizing used by the scene.
pub mod render_settings;
