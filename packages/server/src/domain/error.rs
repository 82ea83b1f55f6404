//! ドメイン層のエラー定義

use thiserror::Error;

/// Value Object の生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("Client ID must not be empty")]
    ClientIdEmpty,
    #[error("Client ID must be at most {0} bytes")]
    ClientIdTooLong(usize),
    #[error("Session ID is required.")]
    SessionIdEmpty,
    #[error("Please enter your name.")]
    NameEmpty,
    #[error("Name must be at most {0} characters.")]
    NameTooLong(usize),
}

/// セッション状態遷移の拒否理由
///
/// いずれも検証は状態変更の前に行われるため、エラー時にセッションは変化しない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("You have already registered. Please wait for the admin to advance.")]
    AlreadyRegistered,
    #[error("This name is already being used. Please choose another one.")]
    NameTaken,
    #[error("Only the admin can perform this action")]
    UnauthorizedAction,
    #[error("At least one participant is required before advancing")]
    NoParticipants,
    #[error("The session is already at its final stage")]
    FinalStage,
    #[error("A participant cannot connect to themselves")]
    SelfConnection,
}

/// Repository のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Session '{0}' not found")]
    SessionNotFound(String),
    #[error("Could not find an unused session code after {0} attempts")]
    SessionIdExhausted(usize),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// MessagePusher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Client '{0}' not found")]
    ClientNotFound(String),
    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
