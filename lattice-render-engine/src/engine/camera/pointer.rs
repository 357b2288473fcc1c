use bevy::prelude::*;
use bevy::window::{CursorLeft, CursorMoved};

use super::viewport_camera::ViewportCamera;

/// Latest pointer position in window coordinates. Intermediate positions
/// within a frame are not queued.
#[derive(Resource, Debug, Default)]
pub struct PointerState {
    position: Option<Vec2>,
}

impl PointerState {
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    pub fn set(&mut self, position: Vec2) {
        self.position = Some(position);
    }

    pub fn clear(&mut self) {
        self.position = None;
    }
}

pub fn track_pointer(
    pointer: Option<ResMut<PointerState>>,
    mut cursor_moved: EventReader<CursorMoved>,
    mut cursor_left: EventReader<CursorLeft>,
) {
    let Some(mut pointer) = pointer else {
        return;
    };

    if cursor_left.read().next().is_some() {
        pointer.clear();
    }
    if let Some(latest) = cursor_moved.read().last() {
        pointer.set(latest.position);
    }
}

/// Remove interaction state once the app is shutting down.
pub fn teardown_interaction_state(mut exit_events: EventReader<AppExit>, mut commands: Commands) {
    if exit_events.read().next().is_some() {
        commands.remove_resource::<PointerState>();
        commands.remove_resource::<ViewportCamera>();
        info!("Interaction state released");
    }
}
