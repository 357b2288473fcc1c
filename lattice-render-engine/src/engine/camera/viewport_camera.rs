use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::EulerRot;
use bevy::prelude::*;

const ORBIT_SENSITIVITY: f32 = 0.005;
const PAN_SENSITIVITY: f32 = 0.0015;
const ZOOM_STEP: f32 = 0.1;
const PITCH_LIMIT: f32 = 1.55;

#[derive(Resource, Debug, Clone)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Fraction of the remaining distance covered per second.
    pub damping: f32,
}

impl ViewportCamera {
    /// Orbit state that places the eye at `eye` looking at `focus`.
    pub fn looking_from(eye: Vec3, focus: Vec3) -> Self {
        let offset = eye - focus;
        let distance = offset.length().max(f32::EPSILON);
        Self {
            focus_point: focus,
            distance,
            yaw: offset.x.atan2(offset.z),
            pitch: -(offset.y / distance).clamp(-1.0, 1.0).asin(),
            min_distance: 2.0,
            max_distance: 400.0,
            damping: 12.0,
        }
    }

    pub fn target_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn target_translation(&self) -> Vec3 {
        self.focus_point + self.target_rotation() * Vec3::Z * self.distance
    }

    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw -= delta.x * ORBIT_SENSITIVITY;
        self.pitch = (self.pitch - delta.y * ORBIT_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Move the focus point in the view plane, scaled by orbit distance.
    pub fn pan(&mut self, delta: Vec2) {
        let rotation = self.target_rotation();
        let right = rotation * Vec3::X;
        let up = rotation * Vec3::Y;
        let speed = self.distance * PAN_SENSITIVITY;
        self.focus_point += (-right * delta.x + up * delta.y) * speed;
    }

    /// Positive scroll moves the eye closer.
    pub fn zoom(&mut self, scroll: f32) {
        let factor = (1.0 - scroll * ZOOM_STEP).max(0.1);
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
    }
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self::looking_from(
            Vec3::from_array(constants::render_settings::CAMERA_START_POSITION),
            Vec3::ZERO,
        )
    }
}

/// Left drag orbits, right drag pans, wheel zooms; the camera transform
/// eases toward the orbit target.
pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    viewport_camera: Option<ResMut<ViewportCamera>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let Some(mut viewport_camera) = viewport_camera else {
        return;
    };
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    if mouse_delta != Vec2::ZERO {
        if mouse_button.pressed(MouseButton::Left) {
            viewport_camera.orbit(mouse_delta);
        } else if mouse_button.pressed(MouseButton::Right) {
            viewport_camera.pan(mouse_delta);
        }
    }

    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }
    if scroll_accum.abs() > f32::EPSILON {
        viewport_camera.zoom(scroll_accum);
    }

    let lerp_speed = (viewport_camera.damping * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform
        .translation
        .lerp(viewport_camera.target_translation(), lerp_speed);
    camera_transform.rotation = camera_transform
        .rotation
        .slerp(viewport_camera.target_rotation(), lerp_speed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looking_from_round_trips_the_eye_position() {
        let eye = Vec3::new(25.0, 20.0, 25.0);
        let camera = ViewportCamera::looking_from(eye, Vec3::ZERO);

        assert!(camera.target_translation().distance(eye) < 1e-3);
    }

    #[test]
    fn target_rotation_faces_the_focus_point() {
        let camera = ViewportCamera::looking_from(Vec3::new(10.0, 5.0, -3.0), Vec3::ONE);
        let forward = camera.target_rotation() * Vec3::NEG_Z;
        let to_focus = (camera.focus_point - camera.target_translation()).normalize();

        assert!(forward.distance(to_focus) < 1e-4);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = ViewportCamera::default();
        for _ in 0..200 {
            camera.zoom(5.0);
        }
        assert_eq!(camera.distance, camera.min_distance);

        for _ in 0..200 {
            camera.zoom(-5.0);
        }
        assert_eq!(camera.distance, camera.max_distance);
    }

    #[test]
    fn orbit_clamps_pitch_and_keeps_distance() {
        let mut camera = ViewportCamera::default();
        let distance = camera.distance;
        camera.orbit(Vec2::new(40.0, -10_000.0));

        assert_eq!(camera.pitch, PITCH_LIMIT);
        assert!((camera.target_translation().distance(camera.focus_point) - distance).abs() < 1e-3);
    }

    #[test]
    fn pan_moves_focus_but_not_orientation() {
        let mut camera = ViewportCamera::default();
        let rotation = camera.target_rotation();
        camera.pan(Vec2::new(100.0, 0.0));

        assert_ne!(camera.focus_point, Vec3::ZERO);
        assert_eq!(camera.target_rotation(), rotation);
    }
}
