//! Transport abstraction
//!
//! The use case layer delivers outbound events through the [`Transport`] trait
//! and never touches sockets directly. [`ConnectionHub`] is the in-memory
//! implementation backing the WebSocket endpoint.

pub mod hub;

pub use hub::ConnectionHub;

use tokio::sync::mpsc::UnboundedSender;

use crate::{
    domain::{ConnectionId, RoomId},
    infrastructure::dto::websocket::OutboundEvent,
};

/// Delivery primitives the relay needs from the underlying transport.
///
/// Sends are fire-and-forget: a closed or unknown connection is logged and
/// skipped, never reported back.
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send {
    /// Attach the outbound channel of a freshly accepted connection.
    fn register(&mut self, id: ConnectionId, sender: UnboundedSender<String>);

    /// Detach a connection and drop it from any scope.
    fn unregister(&mut self, id: &ConnectionId);

    /// Deliver to a single connection.
    fn send_to(&self, id: &ConnectionId, event: &OutboundEvent);

    /// Deliver to every connection in `room_id` except those in `except`.
    fn broadcast_to_room(&self, room_id: &RoomId, event: &OutboundEvent, except: &[ConnectionId]);

    fn join_scope(&mut self, id: &ConnectionId, room_id: &RoomId);

    fn leave_scope(&mut self, id: &ConnectionId, room_id: &RoomId);

    /// Connections currently in no room.
    fn unscoped_connections(&self) -> Vec<ConnectionId>;
}
