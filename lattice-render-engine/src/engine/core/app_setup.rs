use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::render_settings::CLEAR_COLOUR;

// Crate engine modules
use crate::engine::camera::pointer::{PointerState, teardown_interaction_state, track_pointer};
use crate::engine::camera::viewport_camera::{ViewportCamera, camera_controller};
use crate::engine::config::config_loader::{ConfigLoader, finish_config_loading, start_loading};
use crate::engine::config::lattice_config::LatticeConfig;
use crate::engine::core::app_state::AppState;
use crate::engine::core::window_config::create_window_config;
use crate::engine::lattice::point_set::LatticePoints;
use crate::engine::picking::hover::{HoverEvent, HoverTracker};
use crate::engine::picking::update_hover_pick;
use crate::engine::render::instanced_render_plugin::LatticeInstanceRenderPlugin;
use crate::engine::scene::labels::{
    position_world_labels, rebuild_value_labels, spawn_hover_label, update_hover_label,
};
use crate::engine::scene::lattice_cloud::{
    LatticeInstances, spawn_lattice_cloud, sync_lattice_instances,
};
use crate::engine::scene::scaffold::rebuild_scaffold;
use crate::engine::systems::controls::{LatticeControls, keyboard_controls};
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::engine::systems::generation::{
    GenerationOutcome, GenerationStatus, LatticeRng, RegenerateRequest,
    handle_regenerate_requests, tick_busy_indicator,
};
use crate::engine::systems::hud::{hover_readout_update_system, status_text_update_system};
// Web RPC modules
use crate::rpc::notifications::{
    notify_generation_state, notify_hover_transitions, notify_volume_exceeded,
};
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::{fps_tracking::fps_text_update_system, hud::create_native_overlays};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(LatticeInstanceRenderPlugin)
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers LatticeConfig as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<LatticeConfig>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .insert_resource(ClearColor(CLEAR_COLOUR));

    // Interaction state lives from start-up until AppExit.
    app.init_resource::<PointerState>()
        .init_resource::<ViewportCamera>();

    // Compiled defaults until the configuration file has loaded
    app.init_resource::<LatticeConfig>()
        .init_resource::<LatticeControls>()
        .init_resource::<ConfigLoader>()
        .init_resource::<LatticePoints>()
        .init_resource::<LatticeInstances>()
        .init_resource::<HoverTracker>()
        .init_resource::<GenerationStatus>()
        .init_resource::<LatticeRng>()
        .add_event::<RegenerateRequest>()
        .add_event::<GenerationOutcome>()
        .add_event::<HoverEvent>();

    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            finish_config_loading.run_if(in_state(AppState::Loading)),
        )
        .add_systems(Last, teardown_interaction_state);

    // One frame: input, generation, instance sync, pick, overlays, busy tick, notifications.
    app.add_systems(
        Update,
        (
            (track_pointer, keyboard_controls, camera_controller),
            handle_regenerate_requests,
            sync_lattice_instances,
            update_hover_pick,
            (
                rebuild_value_labels,
                rebuild_scaffold,
                // Anchor removal on hover exit must land before re-projection.
                (update_hover_label, position_world_labels).chain(),
                status_text_update_system,
                hover_readout_update_system,
            ),
            tick_busy_indicator,
            (
                notify_hover_transitions,
                notify_volume_exceeded,
                notify_generation_state,
                fps_notification_system,
            ),
        )
            .chain()
            .run_if(in_state(AppState::Running)),
    );

    // Add fps_text_update_system only for native builds.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system);
    }

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

fn spawn_camera(commands: &mut Commands, viewport_camera: &ViewportCamera) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(viewport_camera.target_translation())
            .with_rotation(viewport_camera.target_rotation()),
    ));
}

// Startup system that only handles basic initialisation
fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    viewport_camera: Res<ViewportCamera>,
) {
    println!("=== N-DIMENSIONAL LATTICE PROJECTION ENGINE ===");

    spawn_lighting(&mut commands);
    spawn_camera(&mut commands, &viewport_camera);
    spawn_lattice_cloud(&mut commands, &mut meshes);
    spawn_hover_label(&mut commands);

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
