use std::time::Duration;

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::engine::config::lattice_config::LatticeConfig;
use crate::engine::lattice::generator::generate_lattice;
use crate::engine::lattice::point_set::LatticePoints;
use crate::engine::lattice::projection::project_lattice;
use crate::engine::lattice::volume::LatticeRequest;
use crate::engine::picking::hover::{HoverEvent, HoverTracker};

/// Ask for a fresh lattice of `dimension_size^dimension_count` leaves.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegenerateRequest {
    pub dimension_count: usize,
    pub dimension_size: usize,
}

/// Result of a regenerate request, reported in the frame it was handled.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Completed {
        point_count: usize,
        dimension_count: usize,
        dimension_size: usize,
    },
    Refused {
        message: String,
    },
}

/// Source of leaf values. Seeded from entropy unless a test pins it.
#[derive(Resource)]
pub struct LatticeRng(pub StdRng);

impl Default for LatticeRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

#[cfg(test)]
impl LatticeRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

/// Busy/idle indicator, point count and the last refusal message.
#[derive(Resource, Debug)]
pub struct GenerationStatus {
    busy: bool,
    busy_timer: Timer,
    point_count: usize,
    dimension_count: usize,
    dimension_size: usize,
    limit_message: Option<String>,
}

impl Default for GenerationStatus {
    fn default() -> Self {
        Self {
            busy: false,
            busy_timer: Timer::new(Duration::ZERO, TimerMode::Once),
            point_count: 0,
            dimension_count: 0,
            dimension_size: 0,
            limit_message: None,
        }
    }
}

impl GenerationStatus {
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn dimension_count(&self) -> usize {
        self.dimension_count
    }

    pub fn dimension_size(&self) -> usize {
        self.dimension_size
    }

    pub fn limit_message(&self) -> Option<&str> {
        self.limit_message.as_deref()
    }

    fn begin(&mut self) {
        self.busy = true;
        self.limit_message = None;
    }

    /// Refusals clear the busy flag at once.
    fn refuse(&mut self, message: String) {
        self.busy = false;
        self.limit_message = Some(message);
    }

    /// Keep the indicator up for `delay` after a successful generation.
    pub(super) fn complete(&mut self, request: LatticeRequest, point_count: usize, delay: Duration) {
        self.point_count = point_count;
        self.dimension_count = request.dimension_count;
        self.dimension_size = request.dimension_size;
        self.busy_timer = Timer::new(delay, TimerMode::Once);
        self.busy = !delay.is_zero();
    }

    /// Returns true in the tick the indicator goes idle.
    fn tick(&mut self, delta: Duration) -> bool {
        if !self.busy {
            return false;
        }
        self.busy_timer.tick(delta);
        if self.busy_timer.finished() {
            self.busy = false;
            return true;
        }
        false
    }
}

/// Validate, generate, project and install a new point set.
///
/// Only the latest request of the frame is honoured. Any hover on the old
/// point set is exited before the new one is installed.
pub fn handle_regenerate_requests(
    mut requests: EventReader<RegenerateRequest>,
    config: Res<LatticeConfig>,
    mut rng: ResMut<LatticeRng>,
    mut status: ResMut<GenerationStatus>,
    mut points: ResMut<LatticePoints>,
    mut tracker: ResMut<HoverTracker>,
    mut hover_events: EventWriter<HoverEvent>,
    mut outcomes: EventWriter<GenerationOutcome>,
) {
    let Some(requested) = requests.read().last().copied() else {
        return;
    };

    status.begin();

    let request = match LatticeRequest::validate(
        requested.dimension_count,
        requested.dimension_size,
        config.max_instances,
    ) {
        Ok(request) => request,
        Err(err) => {
            let message = err.to_string();
            warn!("Generation refused: {}", message);
            status.refuse(message.clone());
            outcomes.write(GenerationOutcome::Refused { message });
            return;
        }
    };

    let dims = request.dims();
    let lattice = generate_lattice(&dims, &mut rng.0);
    let projected = project_lattice(&lattice, &dims, &config.projection);
    let point_count = projected.len();

    for event in tracker.invalidate().into_events() {
        hover_events.write(event);
    }
    points.replace(projected, dims);

    let delay = Duration::from_secs_f32(config.busy_indicator_delay_secs.max(0.0));
    status.complete(request, point_count, delay);
    info!(
        "Generated {} points ({}^{})",
        point_count, request.dimension_size, request.dimension_count
    );
    outcomes.write(GenerationOutcome::Completed {
        point_count,
        dimension_count: request.dimension_count,
        dimension_size: request.dimension_size,
    });
}

/// Clear the deferred busy indicator once its delay has elapsed.
pub fn tick_busy_indicator(time: Res<Time>, mut status: ResMut<GenerationStatus>) {
    if !status.is_busy() {
        return;
    }
    if status.bypass_change_detection().tick(time.delta()) {
        status.set_changed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimeUpdateStrategy;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .init_resource::<LatticeConfig>()
            .init_resource::<GenerationStatus>()
            .init_resource::<LatticePoints>()
            .init_resource::<HoverTracker>()
            .insert_resource(LatticeRng::seeded(11))
            .add_event::<RegenerateRequest>()
            .add_event::<HoverEvent>()
            .add_event::<GenerationOutcome>()
            .add_systems(
                Update,
                (handle_regenerate_requests, tick_busy_indicator).chain(),
            );
        app
    }

    fn request(app: &mut App, dimension_count: usize, dimension_size: usize) {
        app.world_mut().send_event(RegenerateRequest {
            dimension_count,
            dimension_size,
        });
        app.update();
    }

    fn outcomes(app: &App) -> Vec<GenerationOutcome> {
        let events = app.world().resource::<Events<GenerationOutcome>>();
        events.get_cursor().read(events).cloned().collect()
    }

    fn hover_events(app: &App) -> Vec<HoverEvent> {
        let events = app.world().resource::<Events<HoverEvent>>();
        events.get_cursor().read(events).cloned().collect()
    }

    #[test]
    fn three_by_four_generates_sixty_four_points() {
        let mut app = test_app();
        request(&mut app, 3, 4);

        let points = app.world().resource::<LatticePoints>();
        assert_eq!(points.len(), 64);
        assert_eq!(points.dim_sizes(), &[4, 4, 4]);
        assert!(points.points().iter().all(|p| p.path.len() == 3 && p.path.iter().all(|&i| i < 4)));

        let status = app.world().resource::<GenerationStatus>();
        assert!(status.is_busy());
        assert_eq!(status.point_count(), 64);
        assert_eq!(status.limit_message(), None);
        assert_eq!(
            outcomes(&app),
            vec![GenerationOutcome::Completed {
                point_count: 64,
                dimension_count: 3,
                dimension_size: 4
            }]
        );

        for _ in 0..5 {
            app.update();
        }
        assert!(!app.world().resource::<GenerationStatus>().is_busy());
    }

    #[test]
    fn oversized_request_is_refused_and_keeps_the_previous_set() {
        let mut app = test_app();
        request(&mut app, 3, 4);
        for _ in 0..5 {
            app.update();
        }
        let generation = app.world().resource::<LatticePoints>().generation();

        request(&mut app, 4, 25);

        let points = app.world().resource::<LatticePoints>();
        assert_eq!(points.len(), 64);
        assert_eq!(points.generation(), generation);

        let status = app.world().resource::<GenerationStatus>();
        assert!(!status.is_busy());
        let message = status.limit_message().unwrap();
        assert!(message.contains("390625"));
        assert!(message.contains("30000"));
        assert!(matches!(
            outcomes(&app).last(),
            Some(GenerationOutcome::Refused { .. })
        ));
    }

    #[test]
    fn refusal_on_first_run_leaves_an_empty_set() {
        let mut app = test_app();
        request(&mut app, 4, 25);

        assert!(app.world().resource::<LatticePoints>().is_empty());
        assert!(!app.world().resource::<GenerationStatus>().is_busy());
    }

    #[test]
    fn replacement_exits_the_current_hover_first() {
        let mut app = test_app();
        request(&mut app, 2, 3);
        let hovered = app.world().resource::<LatticePoints>().points()[4].clone();
        app.world_mut()
            .resource_mut::<HoverTracker>()
            .observe(Some(&hovered));

        request(&mut app, 2, 3);

        assert_eq!(hover_events(&app), vec![HoverEvent::Exit(hovered)]);
        assert!(app.world().resource::<HoverTracker>().hovered().is_none());
        assert_eq!(app.world().resource::<LatticePoints>().generation(), 2);
    }

    #[test]
    fn only_the_latest_request_in_a_frame_is_built() {
        let mut app = test_app();
        app.world_mut().send_event(RegenerateRequest {
            dimension_count: 1,
            dimension_size: 5,
        });
        app.world_mut().send_event(RegenerateRequest {
            dimension_count: 2,
            dimension_size: 2,
        });
        app.update();

        let points = app.world().resource::<LatticePoints>();
        assert_eq!(points.len(), 4);
        assert_eq!(points.generation(), 1);
    }

    #[test]
    fn zero_delay_never_shows_busy() {
        let mut app = test_app();
        app.world_mut()
            .resource_mut::<LatticeConfig>()
            .busy_indicator_delay_secs = 0.0;

        request(&mut app, 2, 2);

        assert!(!app.world().resource::<GenerationStatus>().is_busy());
    }
}
