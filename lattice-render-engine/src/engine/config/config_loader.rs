use bevy::asset::LoadState;
use bevy::prelude::*;

use super::lattice_config::LatticeConfig;
use crate::engine::core::app_state::AppState;
use crate::engine::systems::controls::LatticeControls;
use crate::engine::systems::generation::RegenerateRequest;

pub const CONFIG_PATH: &str = "config/lattice.json";

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<LatticeConfig>>,
}

/// Where the configuration load stands this frame.
#[derive(Debug, PartialEq)]
pub enum ConfigStatus {
    Pending,
    Loaded(LatticeConfig),
    /// The file is missing or malformed; compiled defaults apply.
    Fallback(String),
}

// Start the loading process
pub fn start_loading(mut config_loader: ResMut<ConfigLoader>, asset_server: Res<AssetServer>) {
    info!("Loading configuration from {}", CONFIG_PATH);
    config_loader.handle = Some(asset_server.load(CONFIG_PATH));
}

pub fn poll_config(
    handle: Option<&Handle<LatticeConfig>>,
    load_state: Option<LoadState>,
    configs: &Assets<LatticeConfig>,
) -> ConfigStatus {
    let Some(handle) = handle else {
        return ConfigStatus::Fallback("no configuration requested".to_string());
    };
    if let Some(config) = configs.get(handle) {
        return ConfigStatus::Loaded(config.clone());
    }
    match load_state {
        Some(LoadState::Failed(err)) => ConfigStatus::Fallback(err.to_string()),
        _ => ConfigStatus::Pending,
    }
}

/// Install the configuration, seed the controls from it, request the first
/// lattice and move on to `AppState::Running`.
pub fn finish_config_loading(
    config_loader: Res<ConfigLoader>,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<LatticeConfig>>,
    mut commands: Commands,
    mut next_state: ResMut<NextState<AppState>>,
    mut requests: EventWriter<RegenerateRequest>,
) {
    let handle = config_loader.handle.as_ref();
    let load_state = handle.and_then(|h| asset_server.get_load_state(h));

    let config = match poll_config(handle, load_state, &configs) {
        ConfigStatus::Pending => return,
        ConfigStatus::Loaded(config) => {
            info!("✓ Configuration loaded");
            config.sanitised()
        }
        ConfigStatus::Fallback(reason) => {
            warn!("Configuration unavailable ({}), using defaults", reason);
            LatticeConfig::default()
        }
    };

    let controls = LatticeControls::from_config(&config);
    requests.write(controls.request());
    commands.insert_resource(controls);
    commands.insert_resource(config);

    info!("→ Transitioning to Running state");
    next_state.set(AppState::Running);
}
