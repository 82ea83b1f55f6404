//! Data Transfer Objects (DTOs) for the session server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket message DTOs (inbound commands and outbound events)
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
