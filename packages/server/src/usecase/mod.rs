//! UseCase layer: one use case per inbound command, plus maintenance and queries.
//!
//! Use cases mutate state through the `SessionRepository` and return snapshots;
//! the UI layer decides who is notified and how.

pub mod change_page;
pub mod cleanup_sessions;
pub mod connect_client;
pub mod create_session;
pub mod disconnect_participant;
pub mod error;
pub mod get_sessions;
pub mod join_session;
pub mod register_participant;
pub mod reset_session;
pub mod toggle_connection;

pub use change_page::ChangePageUseCase;
pub use cleanup_sessions::CleanupSessionsUseCase;
pub use connect_client::ConnectClientUseCase;
pub use create_session::CreateSessionUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{
    AdminActionError, CreateSessionError, GetSessionError, RegisterParticipantError,
    ToggleConnectionError,
};
pub use get_sessions::{GetSessionDetailUseCase, GetSessionsUseCase};
pub use join_session::JoinSessionUseCase;
pub use register_participant::RegisterParticipantUseCase;
pub use reset_session::ResetSessionUseCase;
pub use toggle_connection::ToggleConnectionUseCase;
