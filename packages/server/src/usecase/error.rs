//! UseCase 層のエラー定義
//!
//! Repository / ドメインのエラーを、UseCase ごとに意味のある形へ変換する。

use thiserror::Error;

use crate::domain::{RepositoryError, SessionError};

/// セッション作成のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateSessionError {
    #[error("Failed to create session: {0}")]
    Repository(String),
}

impl From<RepositoryError> for CreateSessionError {
    fn from(e: RepositoryError) -> Self {
        CreateSessionError::Repository(e.to_string())
    }
}

/// 参加登録のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterParticipantError {
    #[error("Session '{0}' not found")]
    SessionNotFound(String),
    #[error("You have already registered. Please wait for the admin to advance.")]
    AlreadyRegistered,
    #[error("This name is already being used. Please choose another one.")]
    NameTaken,
    #[error("Registration failed: {0}")]
    Unexpected(String),
}

impl From<RepositoryError> for RegisterParticipantError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::SessionNotFound(id) => RegisterParticipantError::SessionNotFound(id),
            RepositoryError::Session(SessionError::AlreadyRegistered) => {
                RegisterParticipantError::AlreadyRegistered
            }
            RepositoryError::Session(SessionError::NameTaken) => RegisterParticipantError::NameTaken,
            other => RegisterParticipantError::Unexpected(other.to_string()),
        }
    }
}

/// 管理者専用操作（ステージ遷移・リセット）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminActionError {
    #[error("Session '{0}' not found")]
    SessionNotFound(String),
    #[error("Only the admin can perform this action")]
    Unauthorized,
    #[error("{0}")]
    Rejected(SessionError),
    #[error("Admin action failed: {0}")]
    Unexpected(String),
}

impl From<RepositoryError> for AdminActionError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::SessionNotFound(id) => AdminActionError::SessionNotFound(id),
            RepositoryError::Session(SessionError::UnauthorizedAction) => {
                AdminActionError::Unauthorized
            }
            RepositoryError::Session(reason) => AdminActionError::Rejected(reason),
            other => AdminActionError::Unexpected(other.to_string()),
        }
    }
}

/// 接続切り替えのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToggleConnectionError {
    #[error("Session '{0}' not found")]
    SessionNotFound(String),
    #[error("A participant cannot connect to themselves")]
    SelfConnection,
    #[error("Toggle failed: {0}")]
    Unexpected(String),
}

impl From<RepositoryError> for ToggleConnectionError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::SessionNotFound(id) => ToggleConnectionError::SessionNotFound(id),
            RepositoryError::Session(SessionError::SelfConnection) => {
                ToggleConnectionError::SelfConnection
            }
            other => ToggleConnectionError::Unexpected(other.to_string()),
        }
    }
}

/// セッション取得（HTTP API）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetSessionError {
    #[error("Session '{0}' not found")]
    SessionNotFound(String),
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<RepositoryError> for GetSessionError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::SessionNotFound(id) => GetSessionError::SessionNotFound(id),
            other => GetSessionError::RepositoryError(other.to_string()),
        }
    }
}
