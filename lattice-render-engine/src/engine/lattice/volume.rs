use constants::lattice::{
    MAX_DIMENSION_COUNT, MAX_DIMENSION_SIZE, MIN_DIMENSION_COUNT, MIN_DIMENSION_SIZE,
};

use crate::engine::errors::LatticeError;

/// A validated request for a uniform `size^count` lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeRequest {
    pub dimension_count: usize,
    pub dimension_size: usize,
}

impl LatticeRequest {
    /// Validate bounds and the volume cap. Nothing is allocated on refusal.
    pub fn validate(
        dimension_count: usize,
        dimension_size: usize,
        max_instances: usize,
    ) -> Result<Self, LatticeError> {
        if !(MIN_DIMENSION_COUNT..=MAX_DIMENSION_COUNT).contains(&dimension_count) {
            return Err(LatticeError::InvalidDimensionCount {
                requested: dimension_count,
                min: MIN_DIMENSION_COUNT,
                max: MAX_DIMENSION_COUNT,
            });
        }
        if !(MIN_DIMENSION_SIZE..=MAX_DIMENSION_SIZE).contains(&dimension_size) {
            return Err(LatticeError::InvalidDimensionSize {
                requested: dimension_size,
                min: MIN_DIMENSION_SIZE,
                max: MAX_DIMENSION_SIZE,
            });
        }

        let requested = leaf_count(dimension_count, dimension_size);
        if requested > max_instances as u64 {
            return Err(LatticeError::VolumeExceeded {
                dimension_count,
                dimension_size,
                requested,
                capacity: max_instances,
            });
        }

        Ok(Self {
            dimension_count,
            dimension_size,
        })
    }

    pub fn dims(&self) -> Vec<usize> {
        vec![self.dimension_size; self.dimension_count]
    }

    pub fn leaf_count(&self) -> usize {
        self.dimension_size.pow(self.dimension_count as u32)
    }
}

/// `size^count`, saturating instead of overflowing.
pub fn leaf_count(dimension_count: usize, dimension_size: usize) -> u64 {
    (dimension_size as u64)
        .checked_pow(dimension_count as u32)
        .unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_three_by_four() {
        let request = LatticeRequest::validate(3, 4, 30_000).unwrap();

        assert_eq!(request.leaf_count(), 64);
        assert_eq!(request.dims(), vec![4, 4, 4]);
    }

    #[test]
    fn refuses_volume_over_cap() {
        let err = LatticeRequest::validate(4, 25, 30_000).unwrap_err();

        assert_eq!(
            err,
            LatticeError::VolumeExceeded {
                dimension_count: 4,
                dimension_size: 25,
                requested: 390_625,
                capacity: 30_000,
            }
        );
        assert!(err.to_string().contains("390625"));
        assert!(err.to_string().contains("30000"));
    }

    #[test]
    fn cap_is_inclusive() {
        assert!(LatticeRequest::validate(2, 5, 25).is_ok());
        assert!(LatticeRequest::validate(2, 6, 35).is_err());
    }

    #[test]
    fn rejects_out_of_range_inputs() {
        assert!(matches!(
            LatticeRequest::validate(0, 4, 30_000),
            Err(LatticeError::InvalidDimensionCount { requested: 0, .. })
        ));
        assert!(matches!(
            LatticeRequest::validate(9, 2, 30_000),
            Err(LatticeError::InvalidDimensionCount { requested: 9, .. })
        ));
        assert!(matches!(
            LatticeRequest::validate(3, 1, 30_000),
            Err(LatticeError::InvalidDimensionSize { requested: 1, .. })
        ));
        assert!(matches!(
            LatticeRequest::validate(3, 26, 30_000),
            Err(LatticeError::InvalidDimensionSize { requested: 26, .. })
        ));
    }

    #[test]
    fn leaf_count_saturates() {
        assert_eq!(leaf_count(8, 25), 152_587_890_625);
        assert_eq!(leaf_count(64, 25), u64::MAX);
    }
}
