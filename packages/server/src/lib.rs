//! Session server for Tsunagari.
//!
//! Participants join a session by code, register a name, mark whom they are
//! connected with, and the admin walks everyone through the
//! registration → connections → visualization stages. All session state lives in
//! memory and is synchronised to clients over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
