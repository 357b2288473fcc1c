use bevy::prelude::*;
use constants::lattice::{DEFAULT_MAX_INSTANCES, INSTANCE_BUFFER_CAPACITY};
use serde::{Deserialize, Serialize};

/// How normalised lattice coordinates are scaled into world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SpreadMode {
    /// Constant world extent regardless of dimension sizes.
    Fixed { world_units: f32 },
    /// Shrinks the extent when the primary dimension is small so that
    /// low-resolution lattices do not look sparse.
    DimensionScaled {
        per_step: f32,
        max_world_units: f32,
        small_size_limit: usize,
    },
}

impl SpreadMode {
    /// World units spanned by one normalised unit for these dimension sizes.
    pub fn world_scale(&self, dim_sizes: &[usize]) -> f32 {
        match *self {
            Self::Fixed { world_units } => world_units,
            Self::DimensionScaled {
                per_step,
                max_world_units,
                small_size_limit,
            } => {
                let primary = dim_sizes.first().copied().filter(|s| *s > 0).unwrap_or(1);
                if primary < small_size_limit {
                    primary as f32 * per_step
                } else {
                    max_world_units
                }
            }
        }
    }
}

/// Constants of the projection formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionParams {
    /// Geometric shrink per nesting ring, in `(0, 1)`.
    pub decay_base: f32,
    pub spread: SpreadMode,
    pub hue_path_weight: f32,
    pub hue_value_weight: f32,
    pub saturation_base: f32,
    pub saturation_range: f32,
    pub lightness_base: f32,
    pub lightness_range: f32,
    pub size_base: f32,
    pub size_range: f32,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            decay_base: 0.45,
            spread: SpreadMode::DimensionScaled {
                per_step: 7.5,
                max_world_units: 45.0,
                small_size_limit: 6,
            },
            hue_path_weight: 35.0,
            hue_value_weight: 40.0,
            saturation_base: 75.0,
            saturation_range: 25.0,
            lightness_base: 45.0,
            lightness_range: 25.0,
            size_base: 0.15,
            size_range: 0.35,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelPolicy {
    /// Point counts at or below this are labelled in full.
    pub label_all_up_to: usize,
    /// Number of camera-nearest points labelled otherwise.
    pub label_limit: usize,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            label_all_up_to: 64,
            label_limit: 150,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldPolicy {
    /// Estimated line count above which every second axis value is dropped.
    pub line_threshold: usize,
    pub opacity: f32,
    pub decimated_opacity: f32,
    /// Distance beyond the axis extent at which axis labels sit.
    pub axis_label_margin: f32,
}

impl Default for ScaffoldPolicy {
    fn default() -> Self {
        Self {
            line_threshold: 2_500,
            opacity: 0.25,
            decimated_opacity: 0.12,
            axis_label_margin: 3.0,
        }
    }
}

/// Engine configuration, loaded from `config/lattice.json` when present.
#[derive(Asset, TypePath, Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    pub projection: ProjectionParams,
    pub max_instances: usize,
    pub labels: LabelPolicy,
    pub scaffold: ScaffoldPolicy,
    pub busy_indicator_delay_secs: f32,
    pub initial_dimension_count: usize,
    pub initial_dimension_size: usize,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            projection: ProjectionParams::default(),
            max_instances: DEFAULT_MAX_INSTANCES,
            labels: LabelPolicy::default(),
            scaffold: ScaffoldPolicy::default(),
            busy_indicator_delay_secs: 0.2,
            initial_dimension_count: 3,
            initial_dimension_size: 4,
        }
    }
}

impl LatticeConfig {
    /// Clamp values that would break the engine's invariants.
    pub fn sanitised(mut self) -> Self {
        if self.max_instances > INSTANCE_BUFFER_CAPACITY {
            warn!(
                "max_instances {} exceeds buffer capacity {}, clamping",
                self.max_instances, INSTANCE_BUFFER_CAPACITY
            );
            self.max_instances = INSTANCE_BUFFER_CAPACITY;
        }
        if !(self.projection.decay_base > 0.0 && self.projection.decay_base < 1.0) {
            warn!(
                "decay_base {} is outside (0, 1), using default",
                self.projection.decay_base
            );
            self.projection.decay_base = ProjectionParams::default().decay_base;
        }
        self.initial_dimension_count =
            constants::lattice::clamp_dimension_count(self.initial_dimension_count);
        self.initial_dimension_size =
            constants::lattice::clamp_dimension_size(self.initial_dimension_size);
        self
    }
}
