use bevy::prelude::*;
use constants::lattice::{clamp_dimension_count, clamp_dimension_size};

use super::generation::RegenerateRequest;
use crate::engine::config::lattice_config::LatticeConfig;

/// User-facing inputs: the requested lattice shape and the overlay toggles.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct LatticeControls {
    pub dimension_count: usize,
    pub dimension_size: usize,
    pub show_labels: bool,
    pub show_scaffold: bool,
}

impl Default for LatticeControls {
    fn default() -> Self {
        Self::from_config(&LatticeConfig::default())
    }
}

impl LatticeControls {
    pub fn from_config(config: &LatticeConfig) -> Self {
        Self {
            dimension_count: clamp_dimension_count(config.initial_dimension_count),
            dimension_size: clamp_dimension_size(config.initial_dimension_size),
            show_labels: false,
            show_scaffold: true,
        }
    }

    pub fn step_dimension_count(&mut self, delta: isize) {
        self.dimension_count = clamp_dimension_count(self.dimension_count.saturating_add_signed(delta));
    }

    pub fn step_dimension_size(&mut self, delta: isize) {
        self.dimension_size = clamp_dimension_size(self.dimension_size.saturating_add_signed(delta));
    }

    pub fn request(&self) -> RegenerateRequest {
        RegenerateRequest {
            dimension_count: self.dimension_count,
            dimension_size: self.dimension_size,
        }
    }
}

/// Up/Down change N, Right/Left change the size, R regenerates,
/// L toggles value labels, G toggles the scaffold.
pub fn keyboard_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut controls: ResMut<LatticeControls>,
    mut requests: EventWriter<RegenerateRequest>,
) {
    if keyboard.get_just_pressed().next().is_none() {
        return;
    }

    if keyboard.just_pressed(KeyCode::ArrowUp) {
        controls.step_dimension_count(1);
    }
    if keyboard.just_pressed(KeyCode::ArrowDown) {
        controls.step_dimension_count(-1);
    }
    if keyboard.just_pressed(KeyCode::ArrowRight) {
        controls.step_dimension_size(1);
    }
    if keyboard.just_pressed(KeyCode::ArrowLeft) {
        controls.step_dimension_size(-1);
    }
    if keyboard.just_pressed(KeyCode::KeyL) {
        controls.show_labels = !controls.show_labels;
        info!("Value labels {}", if controls.show_labels { "on" } else { "off" });
    }
    if keyboard.just_pressed(KeyCode::KeyG) {
        controls.show_scaffold = !controls.show_scaffold;
        info!("Scaffold {}", if controls.show_scaffold { "on" } else { "off" });
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        requests.write(controls.request());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_clamped_to_request_bounds() {
        let mut controls = LatticeControls::default();
        assert_eq!((controls.dimension_count, controls.dimension_size), (3, 4));

        for _ in 0..20 {
            controls.step_dimension_count(1);
            controls.step_dimension_size(-1);
        }
        assert_eq!((controls.dimension_count, controls.dimension_size), (8, 2));

        for _ in 0..40 {
            controls.step_dimension_count(-1);
            controls.step_dimension_size(1);
        }
        assert_eq!((controls.dimension_count, controls.dimension_size), (1, 25));
    }

    #[test]
    fn regenerate_key_sends_the_current_shape() {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<LatticeControls>()
            .add_event::<RegenerateRequest>()
            .add_systems(Update, keyboard_controls);

        {
            let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keyboard.press(KeyCode::ArrowUp);
            keyboard.press(KeyCode::KeyR);
        }
        app.update();

        let events = app.world().resource::<Events<RegenerateRequest>>();
        let sent: Vec<_> = events.get_cursor().read(events).copied().collect();
        assert_eq!(
            sent,
            vec![RegenerateRequest {
                dimension_count: 4,
                dimension_size: 4
            }]
        );
    }

    #[test]
    fn toggles_flip_overlays() {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<LatticeControls>()
            .add_event::<RegenerateRequest>()
            .add_systems(Update, keyboard_controls);

        {
            let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keyboard.press(KeyCode::KeyL);
            keyboard.press(KeyCode::KeyG);
        }
        app.update();

        let controls = app.world().resource::<LatticeControls>();
        assert!(controls.show_labels);
        assert!(!controls.show_scaffold);
    }
}
