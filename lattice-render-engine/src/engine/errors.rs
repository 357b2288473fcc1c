use thiserror::Error;

/// Reasons a generation request is refused before any lattice is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LatticeError {
    #[error("dimension count {requested} is outside the supported range {min}..={max}")]
    InvalidDimensionCount {
        requested: usize,
        min: usize,
        max: usize,
    },

    #[error("dimension size {requested} is outside the supported range {min}..={max}")]
    InvalidDimensionSize {
        requested: usize,
        min: usize,
        max: usize,
    },

    #[error(
        "Volume too large: {dimension_size}^{dimension_count} = {requested} points exceeds the {capacity} point limit. Lower N or the dimension size."
    )]
    VolumeExceeded {
        dimension_count: usize,
        dimension_size: usize,
        requested: u64,
        capacity: usize,
    },
}

/// An overlay could not be drawn this frame. Only that overlay is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    #[error("render surface unavailable for the {overlay} overlay")]
    RenderSurfaceUnavailable { overlay: &'static str },
}

/// Picking was attempted against instance bounds older than the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickError {
    #[error(
        "instance bounds (revision {bounds_revision}) are stale for buffer revision {buffer_revision}"
    )]
    StaleBounds {
        buffer_revision: u64,
        bounds_revision: u64,
    },
}

/// The instance buffer cannot hold the requested point set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceError {
    #[error("{requested} instances exceed the instance buffer capacity of {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },
}
