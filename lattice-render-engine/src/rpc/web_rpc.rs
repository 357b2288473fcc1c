use bevy::diagnostic::DiagnosticsStore;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::config::lattice_config::LatticeConfig;
use crate::engine::core::app_state::AppState;
use crate::engine::lattice::volume::LatticeRequest;
use crate::engine::picking::hover::HoverTracker;
use crate::engine::systems::controls::LatticeControls;
use crate::engine::systems::fps_tracking::smoothed_fps;
use crate::engine::systems::generation::{GenerationStatus, RegenerateRequest};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Outgoing notification and response queues, flushed once per frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    #[cfg(test)]
    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }
}

/// Plugin establishing the postMessage RPC layer for iframe deployment.
///
/// Incoming requests are handled in `PreUpdate` so their effects are visible
/// to the same frame's `Update` systems; outgoing messages are flushed in
/// `Last`, after every notification of the frame has been queued.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                PreUpdate,
                (process_incoming_messages, handle_rpc_messages).chain(),
            )
            .add_systems(Last, send_outgoing_messages);

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    match window() {
        Some(window) => {
            if let Err(e) = window
                .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            {
                error!("Failed to register message listener: {:?}", e);
            }
        }
        None => error!("Window object not available, RPC disabled"),
    }

    // Ownership moves to JS so the listener outlives this system.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Thread-safe queue filled by the JS message listener.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Engine state an RPC request may read or change.
pub struct RpcContext<'a> {
    pub controls: &'a mut LatticeControls,
    pub status: &'a GenerationStatus,
    pub config: &'a LatticeConfig,
    pub tracker: &'a HoverTracker,
    pub fps: Option<f64>,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    state: Res<State<AppState>>,
    diagnostics: Res<DiagnosticsStore>,
    config: Res<LatticeConfig>,
    mut controls: ResMut<LatticeControls>,
    status: Res<GenerationStatus>,
    tracker: Res<HoverTracker>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut requests: EventWriter<RegenerateRequest>,
) {
    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("Unparseable RPC message: {}", parse_error);
                continue;
            }
        };
        debug!("RPC request: {}", request.method);

        if *state.get() != AppState::Running {
            if let Some(id) = request.id {
                rpc_interface.queue_response(create_error_response(
                    id,
                    RpcError::internal_error("Engine is still loading"),
                ));
            }
            continue;
        }

        let mut context = RpcContext {
            controls: &mut *controls,
            status: &*status,
            config: &*config,
            tracker: &*tracker,
            fps: smoothed_fps(&diagnostics),
        };
        let (response, regenerate) = handle_rpc_request(&request, &mut context);
        if let Some(regenerate) = regenerate {
            requests.write(regenerate);
        }
        if let Some(response) = response {
            rpc_interface.queue_response(response);
        }
    }
}

/// Handle one request. Returns the response (none for notifications) and a
/// regenerate request to dispatch, if the method asked for one.
pub fn handle_rpc_request(
    request: &RpcRequest,
    context: &mut RpcContext,
) -> (Option<RpcResponse>, Option<RegenerateRequest>) {
    let mut regenerate = None;

    let result = match request.method.as_str() {
        "regenerate" => handle_regenerate(&request.params, context, &mut regenerate),
        "set_labels" => handle_toggle(&request.params, &mut context.controls.show_labels),
        "set_scaffold" => handle_toggle(&request.params, &mut context.controls.show_scaffold),
        "get_status" => handle_get_status(context),
        "get_fps" => Ok(serde_json::json!({ "fps": context.fps.unwrap_or(0.0) as f32 })),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            Err(RpcError {
                code: METHOD_NOT_FOUND,
                message: "Method not found".to_string(),
                data: Some(serde_json::json!({ "method": request.method })),
            })
        }
    };

    // Notifications carry no id and get no response.
    let response = request.id.clone().map(|id| match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => create_error_response(id, error),
    });
    (response, regenerate)
}

/// Validate up front so a refusal is answered in the same response. The
/// request is dispatched either way so the engine records the outcome.
fn handle_regenerate(
    params: &serde_json::Value,
    context: &mut RpcContext,
    regenerate: &mut Option<RegenerateRequest>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct RegenerateParams {
        dimension_count: Option<usize>,
        dimension_size: Option<usize>,
    }

    let parsed = if params.is_null() {
        RegenerateParams {
            dimension_count: None,
            dimension_size: None,
        }
    } else {
        serde_json::from_value::<RegenerateParams>(params.clone()).map_err(|_| {
            RpcError::invalid_params("Expected optional 'dimension_count' and 'dimension_size'")
        })?
    };

    let request = RegenerateRequest {
        dimension_count: parsed
            .dimension_count
            .unwrap_or(context.controls.dimension_count),
        dimension_size: parsed
            .dimension_size
            .unwrap_or(context.controls.dimension_size),
    };
    *regenerate = Some(request);

    match LatticeRequest::validate(
        request.dimension_count,
        request.dimension_size,
        context.config.max_instances,
    ) {
        Ok(valid) => {
            context.controls.dimension_count = valid.dimension_count;
            context.controls.dimension_size = valid.dimension_size;
            Ok(serde_json::json!({
                "accepted": true,
                "point_count": valid.leaf_count(),
            }))
        }
        Err(err) => Err(RpcError {
            code: INVALID_PARAMS,
            message: err.to_string(),
            data: Some(serde_json::json!({
                "dimension_count": request.dimension_count,
                "dimension_size": request.dimension_size,
            })),
        }),
    }
}

fn handle_toggle(params: &serde_json::Value, flag: &mut bool) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct ToggleParams {
        enabled: bool,
    }

    let parsed = serde_json::from_value::<ToggleParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'enabled' parameter"))?;
    *flag = parsed.enabled;

    Ok(serde_json::json!({ "enabled": parsed.enabled }))
}

fn handle_get_status(context: &RpcContext) -> Result<serde_json::Value, RpcError> {
    let hovered = serde_json::to_value(context.tracker.hovered())
        .map_err(|e| RpcError::internal_error(&e.to_string()))?;

    Ok(serde_json::json!({
        "busy": context.status.is_busy(),
        "point_count": context.status.point_count(),
        "dimension_count": context.controls.dimension_count,
        "dimension_size": context.controls.dimension_size,
        "limit_message": context.status.limit_message(),
        "show_labels": context.controls.show_labels,
        "show_scaffold": context.controls.show_scaffold,
        "hovered": hovered,
    }))
}

fn create_error_response(id: serde_json::Value, error: RpcError) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(error),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    if rpc_interface.outgoing_notifications.is_empty() && rpc_interface.outgoing_responses.is_empty() {
        return;
    }

    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: INVALID_PARAMS,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: INTERNAL_ERROR,
            message: message.to_string(),
            data: None,
        }
    }
}
