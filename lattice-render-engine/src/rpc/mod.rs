//! JSON-RPC 2.0 communication layer for host page integration.
//!
//! In the browser the engine runs inside an iframe and talks to its parent
//! window over `postMessage`:
//!
//! ```text
//! Host page (parent)  <──postMessage──>  Bevy (iframe)
//!        │                                     │
//!        ├─ Request (with ID) ───────────────> │
//!        │                                     ├─ Process request
//!        │ <────────────── Response (with ID) ─┤
//!        │                                     │
//!        │ <─────────── Notification (no ID) ──┤
//! ```
//!
//! ## Methods
//!
//! - `regenerate { dimension_count?, dimension_size? }`: validate and build a
//!   new lattice; a refused volume is answered with error `-32602` whose
//!   message is the limit message
//! - `set_labels { enabled }` / `set_scaffold { enabled }`: overlay toggles
//! - `get_status`: busy flag, point count, shape, toggles and hovered point
//! - `get_fps`: current smoothed frame rate
//!
//! ## Notifications
//!
//! - `hover_enter` / `hover_exit`: the full point record
//! - `generation_state { busy, point_count, dimension_count, dimension_size }`
//! - `volume_exceeded { message }`
//! - `fps_update { fps }`
//!
//! Natively there is no parent window; outgoing messages are dropped.

/// Request handling, queues and the postMessage transport.
pub mod web_rpc;

/// Engine events forwarded as outgoing notifications.
pub mod notifications;
