use rand::Rng;

/// Rank-N nested container of scalar leaves in `[0, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub enum NDimLattice {
    Leaf(f32),
    Branch(Vec<NDimLattice>),
}

impl NDimLattice {
    /// Number of remaining dimensions below this node.
    #[cfg(test)]
    pub fn rank(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Branch(children) => 1 + children.first().map_or(0, NDimLattice::rank),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Branch(children) => children.iter().map(NDimLattice::leaf_count).sum(),
        }
    }

    /// Leaf value at `path`, if the path addresses a leaf.
    #[cfg(test)]
    pub fn get(&self, path: &[usize]) -> Option<f32> {
        match (self, path.split_first()) {
            (Self::Leaf(value), None) => Some(*value),
            (Self::Branch(children), Some((index, rest))) => children.get(*index)?.get(rest),
            _ => None,
        }
    }
}

/// Build a lattice with `dims[i]` children at depth `i`, every leaf drawn
/// independently from `rng`. Empty `dims` yields a single leaf.
pub fn generate_lattice<R: Rng + ?Sized>(dims: &[usize], rng: &mut R) -> NDimLattice {
    match dims.split_first() {
        None => NDimLattice::Leaf(rng.r#gen::<f32>()),
        Some((&current, rest)) => NDimLattice::Branch(
            (0..current).map(|_| generate_lattice(rest, rng)).collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn leaf_count_is_product_of_dims() {
        let mut rng = StdRng::seed_from_u64(7);
        let lattice = generate_lattice(&[3, 4, 2], &mut rng);

        assert_eq!(lattice.rank(), 3);
        assert_eq!(lattice.leaf_count(), 24);
    }

    #[test]
    fn zero_dimensions_is_a_single_leaf() {
        let mut rng = StdRng::seed_from_u64(1);
        let lattice = generate_lattice(&[], &mut rng);

        assert!(matches!(lattice, NDimLattice::Leaf(_)));
        assert_eq!(lattice.rank(), 0);
    }

    #[test]
    fn leaves_are_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(99);
        let lattice = generate_lattice(&[5, 5, 5], &mut rng);

        for x in 0..5 {
            for y in 0..5 {
                for z in 0..5 {
                    let value = lattice.get(&[x, y, z]).unwrap();
                    assert!((0.0..1.0).contains(&value));
                }
            }
        }
    }

    #[test]
    fn branches_at_same_depth_have_uniform_child_counts() {
        let mut rng = StdRng::seed_from_u64(3);
        let lattice = generate_lattice(&[2, 3], &mut rng);

        let NDimLattice::Branch(top) = &lattice else {
            panic!("expected a branch");
        };
        assert_eq!(top.len(), 2);
        for child in top {
            let NDimLattice::Branch(inner) = child else {
                panic!("expected a branch");
            };
            assert_eq!(inner.len(), 3);
        }
    }

    #[test]
    fn get_rejects_paths_of_wrong_length() {
        let mut rng = StdRng::seed_from_u64(5);
        let lattice = generate_lattice(&[2, 2], &mut rng);

        assert!(lattice.get(&[0]).is_none());
        assert!(lattice.get(&[0, 0, 0]).is_none());
        assert!(lattice.get(&[2, 0]).is_none());
    }
}
