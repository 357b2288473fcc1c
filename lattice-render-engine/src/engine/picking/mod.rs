//! Pointer ray picking against the instanced lattice cloud.
//!
//! Every frame a ray is cast from the camera through the pointer, tested
//! against the cloud's bounds and then each active instance cube. The
//! nearest hit is fed to the [`hover::HoverTracker`], which emits
//! [`hover::HoverEvent`]s only when the hovered point changes.

/// Edge-triggered hover state machine and its events.
pub mod hover;

/// Slab-method ray/AABB intersection.
pub mod ray;

use bevy::prelude::*;

use crate::engine::camera::pointer::PointerState;
use crate::engine::errors::PickError;
use crate::engine::lattice::point_set::LatticePoints;
use crate::engine::scene::lattice_cloud::LatticeInstances;
use hover::{HoverEvent, HoverTracker};
use ray::ray_aabb_hit_t;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub index: usize,
    pub distance: f32,
}

/// Nearest instance along the ray. Refuses to pick against stale bounds.
pub fn pick_instance(
    instances: &LatticeInstances,
    origin: Vec3,
    direction: Vec3,
) -> Result<Option<PickHit>, PickError> {
    let bounds = instances.bounds();
    if bounds.revision != instances.revision() {
        return Err(PickError::StaleBounds {
            buffer_revision: instances.revision(),
            bounds_revision: bounds.revision,
        });
    }
    if bounds.is_empty() || ray_aabb_hit_t(origin, direction, bounds.min, bounds.max).is_none() {
        return Ok(None);
    }

    let mut best: Option<PickHit> = None;
    for (index, instance) in instances.active().iter().enumerate() {
        let half = Vec3::splat(instance.half_extent());
        let centre = instance.centre();
        if let Some(distance) = ray_aabb_hit_t(origin, direction, centre - half, centre + half) {
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(PickHit { index, distance });
            }
        }
    }
    Ok(best)
}

/// Per-frame pick and hover transition detection.
pub fn update_hover_pick(
    pointer: Option<Res<PointerState>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    instances: Res<LatticeInstances>,
    points: Res<LatticePoints>,
    mut tracker: ResMut<HoverTracker>,
    mut hover_events: EventWriter<HoverEvent>,
) {
    let ray = pointer
        .and_then(|pointer| pointer.position())
        .zip(cameras.single().ok())
        .and_then(|(cursor, (camera, camera_transform))| {
            camera.viewport_to_world(camera_transform, cursor).ok()
        });

    let hit = match ray {
        Some(ray) => match pick_instance(&instances, ray.origin, ray.direction.as_vec3()) {
            Ok(hit) => hit,
            Err(err) => {
                error!("Skipping pick: {}", err);
                return;
            }
        },
        None => None,
    };

    let hovered_point = hit.and_then(|hit| points.get(hit.index));
    let transition = tracker.observe(hovered_point);
    if transition.is_empty() {
        return;
    }
    for event in transition.into_events() {
        debug!("Hover {:?}", event_id(&event));
        hover_events.write(event);
    }
}

fn event_id(event: &HoverEvent) -> (&'static str, &str) {
    match event {
        HoverEvent::Enter(point) => ("enter", point.id.as_str()),
        HoverEvent::Exit(point) => ("exit", point.id.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::camera::headless_view::{add_headless_view, window_centre};
    use crate::engine::config::lattice_config::ProjectionParams;
    use crate::engine::lattice::generator::generate_lattice;
    use crate::engine::lattice::projection::{project_lattice, project_leaf};
    use bevy::ecs::event::EventCursor;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn cube_instances() -> (Vec<crate::engine::lattice::projection::ProjectedPoint>, LatticeInstances) {
        let dims = [3, 3, 3];
        let mut rng = StdRng::seed_from_u64(42);
        let lattice = generate_lattice(&dims, &mut rng);
        let points = project_lattice(&lattice, &dims, &ProjectionParams::default());
        let mut instances = LatticeInstances::with_capacity(64);
        instances.write_points(&points).unwrap();
        (points, instances)
    }

    #[test]
    fn picks_the_nearest_instance_along_the_ray() {
        let (points, instances) = cube_instances();
        // size 3 spreads over 22.5 units: axis values -11.25, 0, 11.25
        let hit = pick_instance(&instances, Vec3::new(-11.25, 0.0, 100.0), Vec3::NEG_Z)
            .unwrap()
            .unwrap();

        assert_eq!(points[hit.index].path, vec![0, 1, 2]);
        assert_eq!(hit.index, 5);
    }

    #[test]
    fn ray_between_cells_misses() {
        let (_, instances) = cube_instances();
        let hit = pick_instance(&instances, Vec3::new(5.6, 5.6, 100.0), Vec3::NEG_Z).unwrap();

        assert_eq!(hit, None);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let (_, instances) = cube_instances();
        let hit = pick_instance(&instances, Vec3::new(0.0, 0.0, 100.0), Vec3::Z).unwrap();

        assert_eq!(hit, None);
    }

    #[test]
    fn empty_buffer_never_hits() {
        let instances = LatticeInstances::with_capacity(8);
        let hit = pick_instance(&instances, Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z).unwrap();

        assert_eq!(hit, None);
    }

    #[test]
    fn stale_bounds_are_refused() {
        let (_, mut instances) = cube_instances();
        instances.invalidate_bounds_for_test();

        let err = pick_instance(&instances, Vec3::new(0.0, 0.0, 100.0), Vec3::NEG_Z).unwrap_err();

        assert!(matches!(err, PickError::StaleBounds { .. }));
    }

    /// Three points along x at -11.25, 0 and 11.25, viewed from z = 30.
    fn hover_app() -> App {
        let dims = [3];
        let params = ProjectionParams::default();
        let points: Vec<_> = (0..3).map(|i| project_leaf(&[i], &dims, 0.5, &params)).collect();
        let mut instances = LatticeInstances::with_capacity(8);
        instances.write_points(&points).unwrap();
        let mut lattice_points = LatticePoints::default();
        lattice_points.replace(points, dims.to_vec());

        let mut app = App::new();
        app.insert_resource(instances)
            .insert_resource(lattice_points)
            .init_resource::<HoverTracker>()
            .init_resource::<PointerState>()
            .add_event::<HoverEvent>()
            .add_systems(
                Update,
                (bevy::render::camera::camera_system, update_hover_pick).chain(),
            );
        add_headless_view(&mut app, Vec3::new(0.0, 0.0, 30.0));
        app
    }

    fn drain(app: &App, cursor: &mut EventCursor<HoverEvent>) -> Vec<HoverEvent> {
        let events = app.world().resource::<Events<HoverEvent>>();
        cursor.read(events).cloned().collect()
    }

    #[test]
    fn pointer_over_a_point_enters_once_and_exits_once() {
        let mut app = hover_app();
        let mut cursor = EventCursor::<HoverEvent>::default();
        app.world_mut()
            .resource_mut::<PointerState>()
            .set(window_centre());

        let mut fired = Vec::new();
        for _ in 0..4 {
            app.update();
            fired.extend(drain(&app, &mut cursor));
        }
        assert_eq!(fired.len(), 1);
        let HoverEvent::Enter(point) = &fired[0] else {
            panic!("expected a hover enter, got {:?}", fired[0]);
        };
        assert_eq!(point.id, "1");

        app.world_mut().resource_mut::<PointerState>().clear();
        let mut fired = Vec::new();
        for _ in 0..3 {
            app.update();
            fired.extend(drain(&app, &mut cursor));
        }
        assert_eq!(fired.len(), 1);
        assert!(matches!(&fired[0], HoverEvent::Exit(point) if point.id == "1"));
        assert!(app.world().resource::<HoverTracker>().hovered().is_none());
    }

    #[test]
    fn stale_bounds_skip_the_frame_without_events() {
        let mut app = hover_app();
        let mut cursor = EventCursor::<HoverEvent>::default();
        app.world_mut()
            .resource_mut::<LatticeInstances>()
            .invalidate_bounds_for_test();
        app.world_mut()
            .resource_mut::<PointerState>()
            .set(window_centre());

        app.update();
        app.update();

        assert!(drain(&app, &mut cursor).is_empty());
        assert!(app.world().resource::<HoverTracker>().hovered().is_none());
    }
}
