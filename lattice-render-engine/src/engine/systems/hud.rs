use bevy::prelude::*;
use constants::render_settings::{HUD_TEXT_COLOUR, LIMIT_TEXT_COLOUR};

use super::controls::LatticeControls;
use super::generation::GenerationStatus;
use crate::engine::lattice::projection::ProjectedPoint;
use crate::engine::picking::hover::HoverEvent;

#[derive(Component)]
pub struct FpsText;

#[derive(Component)]
pub struct StatusText;

#[derive(Component)]
pub struct HoverReadout;

/// "N 3 · size 4 · 64 points · idle" for the live point set, then the shape
/// selected for the next regenerate if it differs, then the limit message.
pub fn status_line(controls: &LatticeControls, status: &GenerationStatus) -> String {
    let mut line = format!(
        "N {} · size {} · {} points · {}",
        status.dimension_count(),
        status.dimension_size(),
        status.point_count(),
        if status.is_busy() { "projecting..." } else { "idle" }
    );
    if (controls.dimension_count, controls.dimension_size)
        != (status.dimension_count(), status.dimension_size())
    {
        line.push_str(&format!(
            " · next N {} · size {}",
            controls.dimension_count, controls.dimension_size
        ));
    }
    if let Some(message) = status.limit_message() {
        line.push('\n');
        line.push_str(message);
    }
    line
}

/// Value to four decimals and the index path, e.g. `0.4821  d0 3 · d1 1`.
pub fn hover_readout(point: &ProjectedPoint) -> String {
    let path = point
        .path
        .iter()
        .enumerate()
        .map(|(i, index)| format!("d{} {}", i, index))
        .collect::<Vec<_>>()
        .join(" · ");
    format!("{:.4}  {}", point.value, path)
}

pub fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(HUD_TEXT_COLOUR),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                StatusText,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(HUD_TEXT_COLOUR),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                HoverReadout,
            ));
        });
}

pub fn status_text_update_system(
    controls: Res<LatticeControls>,
    status: Res<GenerationStatus>,
    mut query: Query<(&mut Text, &mut TextColor), With<StatusText>>,
) {
    if !controls.is_changed() && !status.is_changed() {
        return;
    }
    let line = status_line(&controls, &status);
    let colour = if status.limit_message().is_some() {
        LIMIT_TEXT_COLOUR
    } else {
        HUD_TEXT_COLOUR
    };
    for (mut text, mut text_colour) in &mut query {
        text.0.clone_from(&line);
        text_colour.0 = colour;
    }
}

pub fn hover_readout_update_system(
    mut hover_events: EventReader<HoverEvent>,
    mut query: Query<&mut Text, With<HoverReadout>>,
) {
    // The last transition of the frame decides what is shown.
    let Some(event) = hover_events.read().last() else {
        return;
    };
    let readout = match event {
        HoverEvent::Enter(point) => hover_readout(point),
        HoverEvent::Exit(_) => String::new(),
    };
    for mut text in &mut query {
        text.0.clone_from(&readout);
    }
}
