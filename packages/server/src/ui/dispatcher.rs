//! Serial command dispatch.
//!
//! Every inbound command and every disconnect goes through one event loop task that
//! owns the `CommandDispatcher`, so commands for a session never interleave. The idle
//! sweep runs from the same loop.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tsunagari_shared::time::Clock;

use crate::{
    domain::{ClientId, MessagePusher, ParticipantName, Session, SessionId, SessionRepository},
    infrastructure::dto::websocket::{ClientCommand, ServerEvent},
    usecase::{
        AdminActionError, ChangePageUseCase, CleanupSessionsUseCase, CreateSessionUseCase,
        DisconnectParticipantUseCase, JoinSessionUseCase, RegisterParticipantError,
        RegisterParticipantUseCase, ResetSessionUseCase, ToggleConnectionError,
        ToggleConnectionUseCase,
    },
};

/// Event handed to the event loop by a WebSocket connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Command {
        client_id: ClientId,
        command: ClientCommand,
    },
    Disconnected(ClientId),
}

pub type EventSender = mpsc::UnboundedSender<Event>;
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

/// Maps inbound commands onto use cases and their results onto outbound events.
pub struct CommandDispatcher {
    create_session_usecase: CreateSessionUseCase,
    join_session_usecase: JoinSessionUseCase,
    register_participant_usecase: RegisterParticipantUseCase,
    change_page_usecase: ChangePageUseCase,
    toggle_connection_usecase: ToggleConnectionUseCase,
    reset_session_usecase: ResetSessionUseCase,
    disconnect_participant_usecase: DisconnectParticipantUseCase,
    cleanup_sessions_usecase: CleanupSessionsUseCase,
    message_pusher: Arc<dyn MessagePusher>,
}

impl CommandDispatcher {
    /// Create a dispatcher over the given store and pusher
    ///
    /// * `session_ttl` - how long a session without participants is kept
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            create_session_usecase: CreateSessionUseCase::new(repository.clone(), clock.clone()),
            join_session_usecase: JoinSessionUseCase::new(repository.clone(), clock.clone()),
            register_participant_usecase: RegisterParticipantUseCase::new(
                repository.clone(),
                clock.clone(),
            ),
            change_page_usecase: ChangePageUseCase::new(repository.clone()),
            toggle_connection_usecase: ToggleConnectionUseCase::new(repository.clone()),
            reset_session_usecase: ResetSessionUseCase::new(repository.clone()),
            disconnect_participant_usecase: DisconnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            ),
            cleanup_sessions_usecase: CleanupSessionsUseCase::new(repository, clock, session_ttl),
            message_pusher,
        }
    }

    /// Process one event to completion
    pub async fn handle(&self, event: Event) {
        match event {
            Event::Command { client_id, command } => {
                tracing::debug!("'{}' -> {}", client_id, command.name());
                self.handle_command(&client_id, command).await;
            }
            Event::Disconnected(client_id) => self.handle_disconnect(&client_id).await,
        }
    }

    /// Remove idle sessions
    pub async fn sweep(&self) {
        let removed = self.cleanup_sessions_usecase.execute().await;
        if !removed.is_empty() {
            tracing::info!("Sweep reclaimed {} idle session(s)", removed.len());
        }
    }

    async fn handle_command(&self, client_id: &ClientId, command: ClientCommand) {
        match command {
            ClientCommand::CreateSession => self.create_session(client_id).await,
            ClientCommand::JoinSession { session_id } => {
                if let Some(session_id) = self.require_session_id(client_id, session_id).await {
                    self.join_session(client_id, session_id).await;
                }
            }
            ClientCommand::RegisterParticipant {
                session_id,
                name,
                is_admin_only,
            } => {
                if let Some(session_id) = self.require_session_id(client_id, session_id).await {
                    self.register_participant(client_id, &session_id, name, is_admin_only)
                        .await;
                }
            }
            ClientCommand::AdvancePage { session_id } => {
                if let Some(session_id) = self.require_session_id(client_id, session_id).await {
                    let result = self
                        .change_page_usecase
                        .advance(&session_id, client_id)
                        .await;
                    self.finish_admin_action("advancePage", client_id, result)
                        .await;
                }
            }
            ClientCommand::BackToConnections { session_id } => {
                if let Some(session_id) = self.require_session_id(client_id, session_id).await {
                    let result = self
                        .change_page_usecase
                        .back_to_connections(&session_id, client_id)
                        .await;
                    self.finish_admin_action("backToConnections", client_id, result)
                        .await;
                }
            }
            ClientCommand::ToggleConnection {
                session_id,
                target_participant_id,
            } => {
                if let Some(session_id) = self.require_session_id(client_id, session_id).await {
                    self.toggle_connection(client_id, &session_id, target_participant_id)
                        .await;
                }
            }
            ClientCommand::ResetAll { session_id } => {
                if let Some(session_id) = self.require_session_id(client_id, session_id).await {
                    self.reset(client_id, &session_id).await;
                }
            }
        }
    }

    /// Parse the session code carried by a command, answering `sessionError` when absent
    async fn require_session_id(
        &self,
        client_id: &ClientId,
        raw: Option<String>,
    ) -> Option<SessionId> {
        match SessionId::new(raw.unwrap_or_default()) {
            Ok(session_id) => Some(session_id),
            Err(e) => {
                tracing::warn!("'{}' sent a command without a session code", client_id);
                self.send(
                    client_id,
                    &ServerEvent::SessionError {
                        message: e.to_string(),
                    },
                )
                .await;
                None
            }
        }
    }

    async fn create_session(&self, client_id: &ClientId) {
        match self.create_session_usecase.execute().await {
            Ok(session) => {
                self.send(
                    client_id,
                    &ServerEvent::SessionCreated {
                        session_id: session.id.into_string(),
                    },
                )
                .await;
            }
            Err(e) => {
                tracing::error!("{}", e);
                self.send(
                    client_id,
                    &ServerEvent::SessionError {
                        message: e.to_string(),
                    },
                )
                .await;
            }
        }
    }

    async fn join_session(&self, client_id: &ClientId, session_id: SessionId) {
        let session = self
            .join_session_usecase
            .execute(session_id, client_id.clone())
            .await;
        self.send(client_id, &ServerEvent::app_state(&session)).await;
        self.send(
            client_id,
            &ServerEvent::SessionJoined {
                session_id: session.id.as_str().to_string(),
            },
        )
        .await;
        self.send(
            client_id,
            &ServerEvent::FirstUserStatus {
                is_first_user: session.awaiting_first_user(),
            },
        )
        .await;
    }

    async fn register_participant(
        &self,
        client_id: &ClientId,
        session_id: &SessionId,
        name: String,
        admin_only: bool,
    ) {
        let name = match ParticipantName::new(name) {
            Ok(name) => name,
            Err(e) => {
                self.send_registration_error(client_id, e.to_string())
                    .await;
                return;
            }
        };

        match self
            .register_participant_usecase
            .execute(session_id, client_id.clone(), name, admin_only)
            .await
        {
            Ok((registration, session)) => {
                self.broadcast(&session, &ServerEvent::app_state(&session))
                    .await;
                if registration.is_admin() {
                    self.send(client_id, &ServerEvent::AdminStatus { is_admin: true })
                        .await;
                }
                self.send(client_id, &ServerEvent::RegistrationSuccess).await;
            }
            Err(RegisterParticipantError::SessionNotFound(id)) => {
                tracing::warn!("'{}' tried to register in unknown session {}", client_id, id);
            }
            Err(e) => {
                if let RegisterParticipantError::Unexpected(_) = e {
                    tracing::error!("{}", e);
                }
                self.send_registration_error(client_id, e.to_string())
                    .await;
            }
        }
    }

    async fn send_registration_error(&self, client_id: &ClientId, message: String) {
        self.send(client_id, &ServerEvent::RegistrationError { message })
            .await;
    }

    async fn toggle_connection(
        &self,
        client_id: &ClientId,
        session_id: &SessionId,
        target: String,
    ) {
        let Ok(target) = ClientId::new(target) else {
            tracing::warn!("'{}' sent toggleConnection with an invalid target", client_id);
            return;
        };

        match self
            .toggle_connection_usecase
            .execute(session_id, client_id, &target)
            .await
        {
            Ok((_, session)) => {
                self.broadcast(&session, &ServerEvent::connections_update(&session))
                    .await;
            }
            Err(ToggleConnectionError::Unexpected(reason)) => tracing::error!("{}", reason),
            Err(e) => tracing::warn!("toggleConnection from '{}' ignored: {}", client_id, e),
        }
    }

    async fn reset(&self, client_id: &ClientId, session_id: &SessionId) {
        let result = self.reset_session_usecase.execute(session_id, client_id).await;
        if let Some(session) = self.finish_admin_action("resetAll", client_id, result).await {
            self.broadcast(&session, &ServerEvent::ResetComplete).await;
            self.broadcast(&session, &ServerEvent::FirstUserStatus { is_first_user: true })
                .await;
        }
    }

    /// Broadcast the new state after an admin action, or log why nothing happened
    async fn finish_admin_action(
        &self,
        action: &str,
        client_id: &ClientId,
        result: Result<Session, AdminActionError>,
    ) -> Option<Session> {
        match result {
            Ok(session) => {
                self.broadcast(&session, &ServerEvent::app_state(&session))
                    .await;
                Some(session)
            }
            Err(AdminActionError::Unexpected(reason)) => {
                tracing::error!("{} failed: {}", action, reason);
                None
            }
            Err(e) => {
                tracing::debug!("{} from '{}' ignored: {}", action, client_id, e);
                None
            }
        }
    }

    async fn handle_disconnect(&self, client_id: &ClientId) {
        let affected = self.disconnect_participant_usecase.execute(client_id).await;
        tracing::info!(
            "Client '{}' disconnected ({} session(s) affected)",
            client_id,
            affected.len()
        );

        for (session, departure) in affected {
            if let Some(new_admin) = &departure.promoted_admin {
                self.send(new_admin, &ServerEvent::AdminStatus { is_admin: true })
                    .await;
            }
            self.broadcast(&session, &ServerEvent::app_state(&session))
                .await;
        }
    }

    async fn send(&self, client_id: &ClientId, event: &ServerEvent) {
        let json = match event.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize event: {}", e);
                return;
            }
        };
        if let Err(e) = self.message_pusher.push_to(client_id, &json).await {
            tracing::warn!("{}", e);
        }
    }

    async fn broadcast(&self, session: &Session, event: &ServerEvent) {
        let json = match event.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize event: {}", e);
                return;
            }
        };
        if let Err(e) = self.message_pusher.broadcast(session.members(), &json).await {
            tracing::warn!("Broadcast to session {} failed: {}", session.id, e);
        }
    }
}

/// Shortest accepted sweep period (a zero period would make the timer panic)
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Spawn the event loop
///
/// Events are processed strictly one after another. The loop ends once every
/// `EventSender` has been dropped. `sweep_interval` is raised to
/// `MIN_SWEEP_INTERVAL` when shorter.
pub fn spawn_event_loop(
    dispatcher: CommandDispatcher,
    mut events: EventReceiver,
    sweep_interval: Duration,
) -> JoinHandle<()> {
    let sweep_interval = sweep_interval.max(MIN_SWEEP_INTERVAL);
    tokio::spawn(async move {
        let mut sweep = time::interval_at(time::Instant::now() + sweep_interval, sweep_interval);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => dispatcher.handle(event).await,
                    None => break,
                },
                _ = sweep.tick() => dispatcher.sweep().await,
            }
        }

        tracing::info!("Event loop stopped");
    })
}
