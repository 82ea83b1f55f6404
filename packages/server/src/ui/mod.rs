//! UI layer: transport (WebSocket / HTTP) and the serial event loop.

pub mod dispatcher;
mod handler;
mod server;
mod signal;
pub mod state;

pub use dispatcher::{CommandDispatcher, Event, EventSender, spawn_event_loop};
pub use server::{Server, ServerConfig, router};
