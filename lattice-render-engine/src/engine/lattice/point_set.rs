use bevy::prelude::*;

use super::projection::ProjectedPoint;

/// The current point set. Replaced atomically on every successful generation.
#[derive(Resource, Debug, Default)]
pub struct LatticePoints {
    points: Vec<ProjectedPoint>,
    dim_sizes: Vec<usize>,
    generation: u64,
}

impl LatticePoints {
    /// Swap in a new point set, dropping the previous one.
    pub fn replace(&mut self, points: Vec<ProjectedPoint>, dim_sizes: Vec<usize>) {
        self.points = points;
        self.dim_sizes = dim_sizes;
        self.generation += 1;
    }

    pub fn points(&self) -> &[ProjectedPoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&ProjectedPoint> {
        self.points.get(index)
    }

    #[cfg(test)]
    pub fn dim_sizes(&self) -> &[usize] {
        &self.dim_sizes
    }

    pub fn dimension_count(&self) -> usize {
        self.dim_sizes.len()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Incremented on every replacement, starting at 0 for the empty set.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
