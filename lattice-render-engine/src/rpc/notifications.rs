use bevy::prelude::*;

use super::web_rpc::WebRpcInterface;
use crate::engine::picking::hover::HoverEvent;
use crate::engine::systems::generation::{GenerationOutcome, GenerationStatus};

/// Forward hover transitions with the full point record.
pub fn notify_hover_transitions(
    mut hover_events: EventReader<HoverEvent>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in hover_events.read() {
        let (method, point) = match event {
            HoverEvent::Enter(point) => ("hover_enter", point),
            HoverEvent::Exit(point) => ("hover_exit", point),
        };
        match serde_json::to_value(point) {
            Ok(params) => rpc_interface.send_notification(method, params),
            Err(e) => error!("Failed to serialise hovered point {}: {}", point.id, e),
        }
    }
}

pub fn notify_volume_exceeded(
    mut outcomes: EventReader<GenerationOutcome>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for outcome in outcomes.read() {
        if let GenerationOutcome::Refused { message } = outcome {
            rpc_interface.send_notification(
                "volume_exceeded",
                serde_json::json!({ "message": message }),
            );
        }
    }
}

/// Report busy/idle and the point count whenever the status changes.
pub fn notify_generation_state(
    status: Res<GenerationStatus>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if !status.is_changed() {
        return;
    }
    rpc_interface.send_notification(
        "generation_state",
        serde_json::json!({
            "busy": status.is_busy(),
            "point_count": status.point_count(),
            "dimension_count": status.dimension_count(),
            "dimension_size": status.dimension_size(),
        }),
    );
}
