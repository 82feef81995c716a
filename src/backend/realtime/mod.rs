//! Real-time Update Module
//!
//! Per-user rooms and the WebSocket transport on top of them.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs    - Module exports and documentation
//! ├── hub.rs    - Per-user broadcast rooms
//! └── socket.rs - WebSocket upgrade, presence hooks and client relay
//! ```
//!
//! # Event Types
//!
//! - `newMessage` - a message was sent to the user
//! - `messageDeleted` - a message the user could see was deleted for everyone
//! - `friend-online-status` - an accepted friend connected or disconnected
//!
//! Rooms are process-local. Running several instances behind a load balancer
//! needs a shared pub/sub in front of `RealtimeHub::emit`.

/// Per-user rooms
pub mod hub;

/// WebSocket handler
pub mod socket;

pub use hub::{RealtimeHub, ROOM_CAPACITY};
pub use socket::{relay_frame, socket_handler, SocketParams};
