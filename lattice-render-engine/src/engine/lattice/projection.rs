use bevy::prelude::*;
use constants::lattice::PATH_ID_DELIMITER;
use serde::Serialize;

use super::generator::NDimLattice;
use crate::engine::config::lattice_config::ProjectionParams;

/// Hue in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointColour {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl PointColour {
    pub fn to_color(self) -> Color {
        Color::hsl(
            self.hue,
            (self.saturation / 100.0).clamp(0.0, 1.0),
            (self.lightness / 100.0).clamp(0.0, 1.0),
        )
    }

    pub fn to_linear(self) -> LinearRgba {
        self.to_color().to_linear()
    }
}

/// One projected lattice leaf. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub id: String,
    pub position: Vec3,
    pub value: f32,
    pub colour: PointColour,
    pub size: f32,
    pub path: Vec<usize>,
}

/// Join path components into the point id, e.g. `[1, 0, 3]` -> `"1-0-3"`.
pub fn path_id(path: &[usize]) -> String {
    let mut id = String::with_capacity(path.len() * 3);
    for (i, component) in path.iter().enumerate() {
        if i > 0 {
            id.push(PATH_ID_DELIMITER);
        }
        id.push_str(&component.to_string());
    }
    id
}

/// Normalised lattice position before the world spread is applied.
///
/// Axis `i` feeds component `i % 3`, shrunk by `decay_base^(i / 3)` so that
/// every further triple of dimensions nests inside the cell of the previous one.
/// A dimension of size 1 contributes `-0.5`.
pub fn lattice_offset(path: &[usize], dim_sizes: &[usize], decay_base: f32) -> Vec3 {
    let mut offset = Vec3::ZERO;
    for (i, &index) in path.iter().enumerate() {
        let level = (i / 3) as i32;
        let scale = decay_base.powi(level);
        let steps = dim_sizes.get(i).copied().unwrap_or(1).saturating_sub(1).max(1);
        let normalised = index as f32 / steps as f32 - 0.5;
        offset[i % 3] += normalised * scale;
    }
    offset
}

/// Position-weighted checksum separating otherwise symmetric cells.
fn path_sum(path: &[usize]) -> usize {
    path.iter().enumerate().map(|(i, v)| v * (i + 1)).sum()
}

pub fn point_colour(path: &[usize], value: f32, params: &ProjectionParams) -> PointColour {
    let hue = (path_sum(path) as f32 * params.hue_path_weight + value * params.hue_value_weight)
        .rem_euclid(360.0);
    PointColour {
        hue,
        saturation: params.saturation_base + value * params.saturation_range,
        lightness: params.lightness_base + value * params.lightness_range,
    }
}

/// Project a single leaf. Pure in `(path, dim_sizes, value)`.
pub fn project_leaf(
    path: &[usize],
    dim_sizes: &[usize],
    value: f32,
    params: &ProjectionParams,
) -> ProjectedPoint {
    let world_scale = params.spread.world_scale(dim_sizes);
    ProjectedPoint {
        id: path_id(path),
        position: lattice_offset(path, dim_sizes, params.decay_base) * world_scale,
        value,
        colour: point_colour(path, value, params),
        size: params.size_base + value * params.size_range,
        path: path.to_vec(),
    }
}

/// Flatten a lattice into points in lexicographic path order.
///
/// A lattice with no dimensions produces no points.
pub fn project_lattice(
    lattice: &NDimLattice,
    dim_sizes: &[usize],
    params: &ProjectionParams,
) -> Vec<ProjectedPoint> {
    if dim_sizes.is_empty() {
        return Vec::new();
    }
    let mut points = Vec::with_capacity(lattice.leaf_count());
    let mut path = Vec::with_capacity(dim_sizes.len());
    flatten_into(lattice, dim_sizes, params, &mut path, &mut points);
    points
}

fn flatten_into(
    node: &NDimLattice,
    dim_sizes: &[usize],
    params: &ProjectionParams,
    path: &mut Vec<usize>,
    out: &mut Vec<ProjectedPoint>,
) {
    match node {
        NDimLattice::Leaf(value) => out.push(project_leaf(path, dim_sizes, *value, params)),
        NDimLattice::Branch(children) => {
            for (index, child) in children.iter().enumerate() {
                path.push(index);
                flatten_into(child, dim_sizes, params, path, out);
                path.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::lattice_config::SpreadMode;
    use crate::engine::lattice::generator::generate_lattice;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn projected(dims: &[usize], seed: u64) -> (NDimLattice, Vec<ProjectedPoint>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let lattice = generate_lattice(dims, &mut rng);
        let points = project_lattice(&lattice, dims, &ProjectionParams::default());
        (lattice, points)
    }

    fn cartesian(n: usize, size: usize) -> HashSet<Vec<usize>> {
        let mut all = vec![Vec::new()];
        for _ in 0..n {
            all = all
                .into_iter()
                .flat_map(|p| {
                    (0..size).map(move |i| {
                        let mut next = p.clone();
                        next.push(i);
                        next
                    })
                })
                .collect();
        }
        all.into_iter().collect()
    }

    #[test]
    fn covers_the_full_cartesian_product_with_unique_ids() {
        for (n, size) in [(1, 5), (2, 4), (3, 4), (4, 3), (5, 2), (8, 2)] {
            let dims = vec![size; n];
            let (_, points) = projected(&dims, 11);

            assert_eq!(points.len(), size.pow(n as u32));
            let ids: HashSet<_> = points.iter().map(|p| p.id.clone()).collect();
            assert_eq!(ids.len(), points.len());

            let paths: HashSet<_> = points.iter().map(|p| p.path.clone()).collect();
            assert_eq!(paths, cartesian(n, size));
            assert!(points.iter().all(|p| p.path.len() == n));
            assert!(points.iter().all(|p| p.path.iter().all(|i| *i < size)));
        }
    }

    #[test]
    fn points_come_out_in_lexicographic_order() {
        let (_, points) = projected(&[3, 2, 2], 4);

        for pair in points.windows(2) {
            assert!(pair[0].path < pair[1].path);
        }
        assert_eq!(points[0].id, "0-0-0");
        assert_eq!(points[1].id, "0-0-1");
        assert_eq!(points.last().unwrap().id, "2-1-1");
    }

    #[test]
    fn values_are_carried_through_from_the_lattice() {
        let (lattice, points) = projected(&[3, 3], 21);

        for point in &points {
            assert_eq!(lattice.get(&point.path), Some(point.value));
        }
    }

    #[test]
    fn reprojection_is_idempotent() {
        let dims = [4, 4, 4];
        let (lattice, first) = projected(&dims, 8);
        let second = project_lattice(&lattice, &dims, &ProjectionParams::default());

        assert_eq!(first, second);
    }

    #[test]
    fn geometry_and_colour_depend_only_on_path_dims_and_value() {
        let params = ProjectionParams::default();
        let dims = [5, 5, 5, 5];
        let a = project_leaf(&[1, 2, 3, 4], &dims, 0.25, &params);
        let b = project_leaf(&[1, 2, 3, 4], &dims, 0.25, &params);

        assert_eq!(a.position, b.position);
        assert_eq!(a.colour, b.colour);
        assert_eq!(a.size, b.size);
    }

    #[test]
    fn one_dimension_is_colinear_along_x() {
        let (_, points) = projected(&[7], 2);

        assert!(points.iter().all(|p| p.position.y == 0.0 && p.position.z == 0.0));
        let xs: HashSet<_> = points.iter().map(|p| p.position.x.to_bits()).collect();
        assert_eq!(xs.len(), 7);
    }

    #[test]
    fn size_one_dimension_does_not_divide_by_zero() {
        let params = ProjectionParams::default();
        let point = project_leaf(&[0, 2], &[1, 3], 0.5, &params);

        assert!(point.position.is_finite());
        let offset = lattice_offset(&[0, 2], &[1, 3], params.decay_base);
        assert_eq!(offset.x, -0.5);
        assert_eq!(offset.y, 0.5);
    }

    #[test]
    fn axes_cycle_and_rings_decay() {
        let offset = lattice_offset(&[1, 0, 1, 1], &[2, 2, 2, 2], 0.5);

        // axis 0 at ring 0 plus axis 3 at ring 1 both land on x
        assert!((offset.x - (0.5 + 0.5 * 0.5)).abs() < 1e-6);
        assert!((offset.y + 0.5).abs() < 1e-6);
        assert!((offset.z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn nested_rings_stay_inside_the_parent_cell() {
        let params = ProjectionParams::default();
        let dims = [4; 6];
        let coarse = lattice_offset(&[1, 1, 1], &dims[..3], params.decay_base);
        for inner in [[0, 0, 0], [3, 3, 3]] {
            let path = [1, 1, 1, inner[0], inner[1], inner[2]];
            let fine = lattice_offset(&path, &dims, params.decay_base);
            let jitter = (fine - coarse).abs().max_element();
            assert!(jitter <= 0.5 * params.decay_base + 1e-6);
        }
    }

    #[test]
    fn colour_follows_the_hue_formula() {
        let params = ProjectionParams::default();
        let colour = point_colour(&[1, 2, 3], 0.5, &params);

        // path sum = 1*1 + 2*2 + 3*3 = 14 -> 14 * 35 + 0.5 * 40 = 510 -> 150
        assert!((colour.hue - 150.0).abs() < 1e-4);
        assert!((colour.saturation - 87.5).abs() < 1e-4);
        assert!((colour.lightness - 57.5).abs() < 1e-4);
    }

    #[test]
    fn size_grows_with_value() {
        let params = ProjectionParams::default();
        let small = project_leaf(&[0], &[2], 0.1, &params);
        let large = project_leaf(&[0], &[2], 0.9, &params);

        assert!(large.size > small.size);
        assert!((small.size - 0.185).abs() < 1e-6);
    }

    #[test]
    fn spread_mode_changes_world_extent() {
        let mut params = ProjectionParams::default();
        let scaled = project_leaf(&[1], &[2], 0.0, &params);
        params.spread = SpreadMode::Fixed { world_units: 45.0 };
        let fixed = project_leaf(&[1], &[2], 0.0, &params);

        assert_eq!(scaled.position.x, 0.5 * 15.0);
        assert_eq!(fixed.position.x, 0.5 * 45.0);
    }

    #[test]
    fn empty_dimensions_project_to_nothing() {
        let lattice = NDimLattice::Leaf(0.3);
        let points = project_lattice(&lattice, &[], &ProjectionParams::default());

        assert!(points.is_empty());
    }
}
