/// Smallest number of dimensions a generation request may ask for.
pub const MIN_DIMENSION_COUNT: usize = 1;

/// Largest number of dimensions a generation request may ask for.
pub const MAX_DIMENSION_COUNT: usize = 8;

/// Smallest per-dimension size a generation request may ask for.
pub const MIN_DIMENSION_SIZE: usize = 2;

/// Largest per-dimension size a generation request may ask for.
pub const MAX_DIMENSION_SIZE: usize = 25;

/// Number of instance slots reserved in the GPU instance buffer.
/// The configured volume cap must never exceed this.
pub const INSTANCE_BUFFER_CAPACITY: usize = 35_000;

/// Default leaf count above which generation is refused.
pub const DEFAULT_MAX_INSTANCES: usize = 30_000;

/// Delimiter joining index path components into a point id.
pub const PATH_ID_DELIMITER: char = '-';

/// Edge length of the shared cube every point instance is drawn with.
pub const BASE_CUBE_EDGE: f32 = 0.5;

/// Multiplier from a point's `size` to its instance scale.
pub const INSTANCE_SCALE_FACTOR: f32 = 2.5;

/// Clamp a requested dimension count into the supported range.
pub fn clamp_dimension_count(n: usize) -> usize {
    n.clamp(MIN_DIMENSION_COUNT, MAX_DIMENSION_COUNT)
}

/// Clamp a requested dimension size into the supported range.
pub fn clamp_dimension_size(size: usize) -> usize {
    size.clamp(MIN_DIMENSION_SIZE, MAX_DIMENSION_SIZE)
}
