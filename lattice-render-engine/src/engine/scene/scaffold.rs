//! Axis scaffold: wireframe lines through every distinct coordinate the point set uses.
use std::collections::BTreeSet;

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::view::NoFrustumCulling;
use constants::render_settings::{AXIS_LABEL_COLOUR, AXIS_LABEL_FONT_SIZE, SCAFFOLD_COLOUR};

use super::labels::WorldAnchor;
use crate::engine::config::lattice_config::{LatticeConfig, ScaffoldPolicy};
use crate::engine::lattice::point_set::LatticePoints;
use crate::engine::lattice::projection::ProjectedPoint;
use crate::engine::systems::controls::LatticeControls;

const AXIS_NAMES: [&str; 3] = ["X", "Y", "Z"];

/// Coordinates closer than this are treated as the same scaffold value.
const QUANTISE_STEP: f32 = 1.0e-3;

#[derive(Component)]
pub struct ScaffoldLines;

#[derive(Component)]
pub struct AxisLabel;

#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabelPlan {
    pub axis: usize,
    pub position: Vec3,
    pub text: String,
}

/// Geometry and styling of one scaffold build.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaffoldPlan {
    pub segments: Vec<[Vec3; 2]>,
    pub decimated: bool,
    pub opacity: f32,
    pub axis_labels: Vec<AxisLabelPlan>,
}

/// Sorted distinct values of one coordinate across all points.
fn unique_axis_values(points: &[ProjectedPoint], axis: usize) -> Vec<f32> {
    let quantised: BTreeSet<i64> = points
        .iter()
        .map(|p| (p.position[axis] / QUANTISE_STEP).round() as i64)
        .collect();
    quantised
        .into_iter()
        .map(|q| q as f32 * QUANTISE_STEP)
        .collect()
}

/// Every second value, always keeping the last so the outer extent survives.
fn decimate(values: &[f32]) -> Vec<f32> {
    let mut kept: Vec<f32> = values.iter().step_by(2).copied().collect();
    if let Some(&last) = values.last() {
        if values.len() % 2 == 0 {
            kept.push(last);
        }
    }
    kept
}

/// Lines along each axis, one per pair of values on the other two axes.
fn estimate_line_count(axes: &[Vec<f32>; 3]) -> usize {
    let [x, y, z] = axes.each_ref().map(Vec::len);
    y * z + x * z + x * y
}

/// "X: d0 d3 d6" for the dimensions that fold onto `axis`.
pub fn axis_label_text(axis: usize, dimension_count: usize) -> Option<String> {
    let dims: Vec<String> = (axis..dimension_count)
        .step_by(3)
        .map(|i| format!("d{}", i))
        .collect();
    if dims.is_empty() {
        return None;
    }
    Some(format!("{}: {}", AXIS_NAMES[axis], dims.join(" ")))
}

pub fn build_scaffold(
    points: &[ProjectedPoint],
    dimension_count: usize,
    policy: &ScaffoldPolicy,
) -> ScaffoldPlan {
    if points.is_empty() {
        return ScaffoldPlan {
            segments: Vec::new(),
            decimated: false,
            opacity: policy.opacity,
            axis_labels: Vec::new(),
        };
    }

    let mut axes: [Vec<f32>; 3] = [0, 1, 2].map(|axis| unique_axis_values(points, axis));
    let estimated = estimate_line_count(&axes);
    let decimated = estimated > policy.line_threshold;
    if decimated {
        axes = axes.map(|values| decimate(&values));
        info!(
            "Scaffold decimated: {} estimated lines over threshold {}, {} kept",
            estimated,
            policy.line_threshold,
            estimate_line_count(&axes)
        );
    }

    let extent = |axis: usize| {
        let values = &axes[axis];
        (
            values.first().copied().unwrap_or(0.0),
            values.last().copied().unwrap_or(0.0),
        )
    };

    let mut segments = Vec::with_capacity(estimate_line_count(&axes));
    for axis in 0..3 {
        let (min, max) = extent(axis);
        if (max - min).abs() < QUANTISE_STEP {
            continue;
        }
        let (a, b) = ((axis + 1) % 3, (axis + 2) % 3);
        for &u in &axes[a] {
            for &v in &axes[b] {
                let mut start = Vec3::ZERO;
                start[a] = u;
                start[b] = v;
                let mut end = start;
                start[axis] = min;
                end[axis] = max;
                segments.push([start, end]);
            }
        }
    }

    let axis_labels = (0..3)
        .filter_map(|axis| {
            let text = axis_label_text(axis, dimension_count)?;
            let mut position = Vec3::ZERO;
            position[axis] = extent(axis).1 + policy.axis_label_margin;
            Some(AxisLabelPlan {
                axis,
                position,
                text,
            })
        })
        .collect();

    ScaffoldPlan {
        segments,
        decimated,
        opacity: if decimated {
            policy.decimated_opacity
        } else {
            policy.opacity
        },
        axis_labels,
    }
}

fn scaffold_mesh(segments: &[[Vec3; 2]]) -> Mesh {
    let vertices: Vec<[f32; 3]> = segments
        .iter()
        .flat_map(|[start, end]| [start.to_array(), end.to_array()])
        .collect();

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh
}

/// Rebuild the scaffold wholesale when the point set or its toggle changes.
pub fn rebuild_scaffold(
    mut commands: Commands,
    points: Res<LatticePoints>,
    controls: Res<LatticeControls>,
    config: Res<LatticeConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    existing: Query<Entity, Or<(With<ScaffoldLines>, With<AxisLabel>)>>,
    mut built_for: Local<Option<(u64, bool)>>,
) {
    let key = (points.generation(), controls.show_scaffold);
    if *built_for == Some(key) {
        return;
    }
    *built_for = Some(key);

    for entity in &existing {
        commands.entity(entity).despawn();
    }
    if !controls.show_scaffold {
        return;
    }

    let plan = build_scaffold(points.points(), points.dimension_count(), &config.scaffold);
    if !plan.segments.is_empty() {
        let material = materials.add(StandardMaterial {
            base_color: SCAFFOLD_COLOUR.with_alpha(plan.opacity),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
        commands.spawn((
            Mesh3d(meshes.add(scaffold_mesh(&plan.segments))),
            MeshMaterial3d(material),
            Visibility::Visible,
            NoFrustumCulling,
            Transform::IDENTITY,
            ScaffoldLines,
        ));
    }

    for label in plan.axis_labels {
        commands.spawn((
            Text::new(label.text),
            TextFont {
                font_size: AXIS_LABEL_FONT_SIZE,
                ..default()
            },
            TextColor(AXIS_LABEL_COLOUR),
            Node {
                position_type: PositionType::Absolute,
                ..default()
            },
            Visibility::Hidden,
            WorldAnchor(label.position),
            AxisLabel,
        ));
    }
}
