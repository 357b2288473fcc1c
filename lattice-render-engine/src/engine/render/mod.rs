//! GPU side of the lattice cloud.
//!
//! The main world keeps the active instances in a [`LatticeInstanceData`]
//! component; it is extracted every frame, uploaded as a per-instance vertex
//! buffer, and drawn with a single instanced call in the transparent phase.
//!
//! [`LatticeInstanceData`]: instanced_render_plugin::LatticeInstanceData

/// Instanced cube pipeline, extraction and draw command.
pub mod instanced_render_plugin;
