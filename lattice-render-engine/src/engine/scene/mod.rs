//! Scene content derived from the live point set.
//!
//! The instanced cloud mirrors the point set into the instance buffer; labels
//! and the axis scaffold are optional overlays rebuilt wholesale whenever the
//! point set or their toggle changes.

/// Instanced point cloud entity, instance buffer and hit-test bounds.
pub mod lattice_cloud;

/// Nearest-to-camera value labels and the hover label.
///
/// All labels are UI text pinned to a world position and re-projected every frame.
pub mod labels;

/// Wireframe axis scaffold with line-count decimation.
pub mod scaffold;
