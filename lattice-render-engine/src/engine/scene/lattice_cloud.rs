use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;
use constants::lattice::{BASE_CUBE_EDGE, INSTANCE_BUFFER_CAPACITY, INSTANCE_SCALE_FACTOR};

use crate::engine::errors::InstanceError;
use crate::engine::lattice::point_set::LatticePoints;
use crate::engine::lattice::projection::ProjectedPoint;
use crate::engine::render::instanced_render_plugin::{InstanceData, LatticeInstanceData};

/// Marker for the single instanced mesh entity drawing every point.
#[derive(Component)]
pub struct LatticeCloud;

/// Axis-aligned bounds over every active instance, tagged with the buffer
/// revision they were computed for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceBounds {
    pub min: Vec3,
    pub max: Vec3,
    pub revision: u64,
}

impl InstanceBounds {
    fn empty(revision: u64) -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
            revision,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    fn include(&mut self, centre: Vec3, half_extent: f32) {
        self.min = self.min.min(centre - Vec3::splat(half_extent));
        self.max = self.max.max(centre + Vec3::splat(half_extent));
    }
}

/// CPU side of the instanced point buffer with a fixed slot capacity.
#[derive(Resource, Debug)]
pub struct LatticeInstances {
    slots: Vec<InstanceData>,
    active: usize,
    revision: u64,
    bounds: InstanceBounds,
}

impl Default for LatticeInstances {
    fn default() -> Self {
        Self::with_capacity(INSTANCE_BUFFER_CAPACITY)
    }
}

impl LatticeInstances {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![InstanceData::default(); capacity],
            active: 0,
            revision: 0,
            bounds: InstanceBounds::empty(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Rewrite one slot per point and recompute bounds for the new contents.
    pub fn write_points(&mut self, points: &[ProjectedPoint]) -> Result<(), InstanceError> {
        if points.len() > self.capacity() {
            return Err(InstanceError::CapacityExceeded {
                requested: points.len(),
                capacity: self.capacity(),
            });
        }

        for (slot, point) in self.slots.iter_mut().zip(points) {
            *slot = InstanceData::from_point(point);
        }
        self.active = points.len();
        self.revision += 1;
        self.recompute_bounds();
        Ok(())
    }

    fn recompute_bounds(&mut self) {
        let mut bounds = InstanceBounds::empty(self.revision);
        for instance in self.active() {
            bounds.include(instance.centre(), instance.half_extent());
        }
        self.bounds = bounds;
    }

    pub fn active(&self) -> &[InstanceData] {
        &self.slots[..self.active]
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn bounds(&self) -> &InstanceBounds {
        &self.bounds
    }

    #[cfg(test)]
    pub fn invalidate_bounds_for_test(&mut self) {
        self.bounds.revision = self.revision.wrapping_sub(1);
    }
}

impl InstanceData {
    pub fn from_point(point: &ProjectedPoint) -> Self {
        Self {
            position: point.position.to_array(),
            scale: point.size * INSTANCE_SCALE_FACTOR,
            colour: point.colour.to_linear().to_f32_array(),
        }
    }

    pub fn centre(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn half_extent(&self) -> f32 {
        BASE_CUBE_EDGE * 0.5 * self.scale
    }
}

pub fn spawn_lattice_cloud(commands: &mut Commands, meshes: &mut Assets<Mesh>) {
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(BASE_CUBE_EDGE, BASE_CUBE_EDGE, BASE_CUBE_EDGE))),
        Transform::IDENTITY,
        Visibility::Visible,
        LatticeInstanceData(Vec::with_capacity(INSTANCE_BUFFER_CAPACITY)),
        LatticeCloud,
        NoFrustumCulling,
    ));
}

/// Push the current point set into the instance buffer whenever it changes.
pub fn sync_lattice_instances(
    points: Res<LatticePoints>,
    mut instances: ResMut<LatticeInstances>,
    mut cloud: Query<&mut LatticeInstanceData, With<LatticeCloud>>,
) {
    if !points.is_changed() {
        return;
    }

    match instances.write_points(points.points()) {
        Ok(()) => debug!(
            "Instance buffer rewritten: {} instances (revision {})",
            instances.active_count(),
            instances.revision()
        ),
        Err(err) => {
            error!("Instance sync failed: {}", err);
            return;
        }
    }

    for mut data in &mut cloud {
        data.0.clear();
        data.0.extend_from_slice(instances.active());
    }
}
