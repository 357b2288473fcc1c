use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    /// Waiting for `config/lattice.json` to load or fail.
    #[default]
    Loading,
    Running,
}
