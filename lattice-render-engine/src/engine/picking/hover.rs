use bevy::prelude::*;

use crate::engine::lattice::projection::ProjectedPoint;

/// Hover transitions reported to the presentation layer.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum HoverEvent {
    Enter(ProjectedPoint),
    Exit(ProjectedPoint),
}

/// The result of one edge-triggered comparison. Empty when nothing changed.
#[derive(Debug, Default, PartialEq)]
pub struct HoverTransition {
    pub exited: Option<ProjectedPoint>,
    pub entered: Option<ProjectedPoint>,
}

impl HoverTransition {
    pub fn is_empty(&self) -> bool {
        self.exited.is_none() && self.entered.is_none()
    }

    /// Exit before enter.
    pub fn into_events(self) -> impl Iterator<Item = HoverEvent> {
        self.exited
            .map(HoverEvent::Exit)
            .into_iter()
            .chain(self.entered.map(HoverEvent::Enter))
    }
}

/// Tracks the hovered point across frames and reports only changes.
#[derive(Resource, Debug, Default)]
pub struct HoverTracker {
    hovered: Option<ProjectedPoint>,
}

impl HoverTracker {
    pub fn hovered(&self) -> Option<&ProjectedPoint> {
        self.hovered.as_ref()
    }

    /// Compare this frame's hit against the last one.
    pub fn observe(&mut self, hit: Option<&ProjectedPoint>) -> HoverTransition {
        let same = match (&self.hovered, hit) {
            (Some(current), Some(next)) => current.id == next.id,
            (None, None) => true,
            _ => false,
        };
        if same {
            return HoverTransition::default();
        }

        let exited = self.hovered.take();
        self.hovered = hit.cloned();
        HoverTransition {
            exited,
            entered: self.hovered.clone(),
        }
    }

    /// Drop any hover state, e.g. because the point set it refers to is
    /// being replaced. Reports an exit if something was hovered.
    pub fn invalidate(&mut self) -> HoverTransition {
        HoverTransition {
            exited: self.hovered.take(),
            entered: None,
        }
    }
}
