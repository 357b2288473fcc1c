use bevy::prelude::*;
use constants::render_settings::{
    HOVER_LABEL_FONT_SIZE, HOVER_LABEL_LIFT, VALUE_LABEL_FONT_SIZE, VALUE_LABEL_LIFT,
};

use crate::engine::config::lattice_config::{LabelPolicy, LatticeConfig};
use crate::engine::errors::OverlayError;
use crate::engine::lattice::point_set::LatticePoints;
use crate::engine::lattice::projection::ProjectedPoint;
use crate::engine::picking::hover::HoverEvent;
use crate::engine::systems::controls::LatticeControls;

/// World position a UI node is pinned to. Re-projected to the screen every frame.
#[derive(Component, Debug, Clone, Copy)]
pub struct WorldAnchor(pub Vec3);

/// One label of the decimated value-label set.
#[derive(Component)]
pub struct ValueLabel;

#[derive(Component)]
pub struct HoverLabel;

/// Indices of the points that receive a value label.
///
/// Small sets are labelled in full. Otherwise the `label_limit` points nearest
/// to `camera_position` are chosen, nearest first.
pub fn select_label_indices(
    points: &[ProjectedPoint],
    camera_position: Vec3,
    policy: &LabelPolicy,
) -> Vec<usize> {
    if points.len() <= policy.label_all_up_to {
        return (0..points.len()).collect();
    }

    let mut ranked: Vec<(f32, usize)> = points
        .iter()
        .enumerate()
        .map(|(index, point)| (point.position.distance_squared(camera_position), index))
        .collect();

    let limit = policy.label_limit.min(ranked.len());
    if limit == 0 {
        return Vec::new();
    }
    if limit < ranked.len() {
        ranked.select_nth_unstable_by(limit - 1, |a, b| a.0.total_cmp(&b.0));
        ranked.truncate(limit);
    }
    ranked.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    ranked.into_iter().map(|(_, index)| index).collect()
}

fn overlay_camera<'a>(
    cameras: &'a Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    overlay: &'static str,
) -> Result<(&'a Camera, &'a GlobalTransform), OverlayError> {
    cameras
        .single()
        .map_err(|_| OverlayError::RenderSurfaceUnavailable { overlay })
}

/// Rebuild the value-label set wholesale whenever the point set or the label
/// toggle changes. Ranking uses the camera position at rebuild time.
pub fn rebuild_value_labels(
    mut commands: Commands,
    points: Res<LatticePoints>,
    controls: Res<LatticeControls>,
    config: Res<LatticeConfig>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    existing: Query<Entity, With<ValueLabel>>,
    mut built_for: Local<Option<(u64, bool)>>,
) {
    let key = (points.generation(), controls.show_labels);
    if *built_for == Some(key) {
        return;
    }

    for entity in &existing {
        commands.entity(entity).despawn();
    }
    *built_for = Some(key);

    if !controls.show_labels || points.is_empty() {
        return;
    }

    let camera_position = match overlay_camera(&cameras, "value labels") {
        Ok((_, transform)) => transform.translation(),
        Err(err) => {
            error!("{}", err);
            *built_for = None;
            return;
        }
    };

    let selected = select_label_indices(points.points(), camera_position, &config.labels);
    for &index in &selected {
        let Some(point) = points.get(index) else {
            continue;
        };
        commands.spawn((
            Text::new(format!("{:.2}", point.value)),
            TextFont {
                font_size: VALUE_LABEL_FONT_SIZE,
                ..default()
            },
            TextColor(point.colour.to_color()),
            Node {
                position_type: PositionType::Absolute,
                ..default()
            },
            Visibility::Hidden,
            WorldAnchor(point.position + Vec3::Y * VALUE_LABEL_LIFT),
            ValueLabel,
        ));
    }
    debug!(
        "Value labels rebuilt: {} of {} points",
        selected.len(),
        points.len()
    );
}

pub fn spawn_hover_label(commands: &mut Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: HOVER_LABEL_FONT_SIZE,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            ..default()
        },
        Visibility::Hidden,
        HoverLabel,
    ));
}

/// Show the hover label on enter and hide it on exit.
pub fn update_hover_label(
    mut commands: Commands,
    mut hover_events: EventReader<HoverEvent>,
    mut label: Query<(Entity, &mut Text, &mut TextColor, &mut Visibility), With<HoverLabel>>,
) {
    let Ok((entity, mut text, mut colour, mut visibility)) = label.single_mut() else {
        return;
    };

    for event in hover_events.read() {
        match event {
            HoverEvent::Enter(point) => {
                text.0 = format!("{:.4}", point.value);
                colour.0 = point.colour.to_color();
                commands
                    .entity(entity)
                    .insert(WorldAnchor(point.position + Vec3::Y * HOVER_LABEL_LIFT));
            }
            HoverEvent::Exit(_) => {
                commands.entity(entity).remove::<WorldAnchor>();
                *visibility = Visibility::Hidden;
            }
        }
    }
}

/// Re-project every anchored label to the screen. Labels behind the camera
/// or outside the viewport are hidden.
pub fn position_world_labels(
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut labels: Query<(&WorldAnchor, &mut Node, &mut Visibility)>,
) {
    if labels.is_empty() {
        return;
    }
    let (camera, camera_transform) = match overlay_camera(&cameras, "world labels") {
        Ok(camera) => camera,
        Err(err) => {
            error!("{}", err);
            return;
        }
    };

    for (anchor, mut node, mut visibility) in &mut labels {
        match camera.world_to_viewport(camera_transform, anchor.0) {
            Ok(screen) => {
                node.left = Val::Px(screen.x);
                node.top = Val::Px(screen.y);
                visibility.set_if_neq(Visibility::Inherited);
            }
            Err(_) => {
                visibility.set_if_neq(Visibility::Hidden);
            }
        }
    }
}
