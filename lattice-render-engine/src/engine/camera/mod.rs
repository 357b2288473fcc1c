//! Orbit camera and pointer state for lattice exploration.
//!
//! Both resources are created once at start-up, written only by the input
//! systems in this module, read by the frame tick, and removed on exit.

/// Last known pointer position, last write wins.
pub mod pointer;

/// Orbit/pan/zoom camera resource and controller system.
pub mod viewport_camera;

#[cfg(test)]
pub mod headless_view;
