use bevy::prelude::*;

/// Slab-method ray/AABB intersection. Returns the entry distance along the
/// ray, or the exit distance when the origin is inside the box.
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = Vec3::new(
        reciprocal(ray_direction.x),
        reciprocal(ray_direction.y),
        reciprocal(ray_direction.z),
    );

    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let (mut t0, mut t1) = (
            (min[axis] - ray_origin[axis]) * inv[axis],
            (max[axis] - ray_origin[axis]) * inv[axis],
        );
        if t0.is_nan() || t1.is_nan() {
            // Ray parallel to this slab and starting on its boundary.
            continue;
        }
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;
    }
    Some(if t_near >= 0.0 { t_near } else { t_far })
}

fn reciprocal(component: f32) -> f32 {
    if component != 0.0 {
        1.0 / component
    } else {
        f32::INFINITY
    }
}
