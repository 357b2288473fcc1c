//! Runtime systems driving generation, user controls and the HUD.

/// Keyboard controls and the lattice shape/toggle resource.
pub mod controls;

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to the host page via RPC and updates the native overlay.
pub mod fps_tracking;

/// Regenerate requests, the busy indicator and generation outcomes.
pub mod generation;

/// Native status line and hover readout.
pub mod hud;
