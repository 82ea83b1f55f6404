//! Domain layer: value objects, entities, and the interfaces the outer layers implement.

pub mod connection_graph;
pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use connection_graph::{
    ConnectionGraph, IntegrationLevel, IntegrationStatistics, ParticipantIntegration, Toggle,
};
pub use entity::{Departure, Participant, Registration, Session};
pub use error::{MessagePushError, RepositoryError, SessionError, ValueObjectError};
pub use factory::{SESSION_ID_ALPHABET, SessionIdFactory};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::SessionRepository;
pub use value_object::{ClientId, Page, ParticipantName, SESSION_ID_LEN, SessionId, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
