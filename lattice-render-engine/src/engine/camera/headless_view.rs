use bevy::prelude::*;
use bevy::render::camera::ManualTextureViews;
use bevy::window::{PrimaryWindow, WindowCreated, WindowResized, WindowScaleFactorChanged};

/// Window-backed camera without a renderer, so viewport projection works in
/// headless tests. `camera_system` has to run before any system that projects.
pub fn add_headless_view(app: &mut App, eye: Vec3) -> Entity {
    app.init_resource::<Assets<Image>>()
        .init_resource::<ManualTextureViews>()
        .add_event::<WindowCreated>()
        .add_event::<WindowResized>()
        .add_event::<WindowScaleFactorChanged>()
        .add_event::<AssetEvent<Image>>();

    app.world_mut().spawn((Window::default(), PrimaryWindow));
    let transform = Transform::from_translation(eye).looking_at(Vec3::ZERO, Vec3::Y);
    app.world_mut()
        .spawn((Camera3d::default(), transform, GlobalTransform::from(transform)))
        .id()
}

/// Centre of the default 1280x720 window in logical pixels.
pub fn window_centre() -> Vec2 {
    Vec2::new(640.0, 360.0)
}
