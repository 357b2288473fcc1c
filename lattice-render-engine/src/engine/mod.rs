pub mod camera;
pub mod config;
pub mod core;
pub mod errors;
pub mod lattice;
pub mod picking;
pub mod render;
pub mod scene;
pub mod systems;
