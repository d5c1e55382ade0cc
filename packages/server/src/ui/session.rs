//! Per-connection message protocol.
//!
//! One `SessionProtocolHandler` lives for the lifetime of a WebSocket connection.
//! It interprets inbound frames, drives the usecases and replies with `error`
//! messages. Room membership is derived from the room store, so the handler only
//! keeps the identity established by the first successful `join`.

use std::sync::Arc;

use crate::{
    domain::{Connection, ConnectionId, SessionEvent, UserId, Verdict},
    infrastructure::dto::websocket::ClientMessage,
    usecase::{SubmissionError, VerdictError, VerdictOutcome},
};

use super::state::AppState;

pub struct SessionProtocolHandler {
    state: Arc<AppState>,
    connection_id: ConnectionId,
    /// Set once by the first successful `join`
    connection: Option<Connection>,
}

impl SessionProtocolHandler {
    pub fn new(state: Arc<AppState>, connection_id: ConnectionId) -> Self {
        Self {
            state,
            connection_id,
            connection: None,
        }
    }

    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    /// Handle one inbound text frame.
    pub async fn handle_text(&mut self, text: &str) {
        let message = match serde_json::from_str::<ClientMessage>(text) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Malformed message on '{}': {}", self.connection_id, e);
                self.reply_error(format!("malformed message: {}", e)).await;
                return;
            }
        };

        match message {
            ClientMessage::Join { user_id } => self.on_join(user_id.into()).await,
            ClientMessage::Submission { room_id } => self.on_submission(&room_id).await,
            ClientMessage::Verdict { verdict } => self.on_verdict(Verdict::new(verdict)).await,
        }
    }

    /// Handle an inbound binary frame; only JSON text is understood.
    pub async fn handle_binary(&mut self) {
        self.reply_error("malformed message: binary frames are not supported")
            .await;
    }

    /// Tear down everything this connection still holds.
    pub async fn terminate(self) {
        let outcome = self
            .state
            .disconnect_connection_usecase
            .execute(self.connection_id, self.connection.as_ref())
            .await;

        match &self.connection {
            Some(connection) => tracing::info!(
                "User '{}' disconnected (dequeued: {}, room closed: {})",
                connection.user_id,
                outcome.dequeued,
                outcome.closed_room.is_some()
            ),
            None => tracing::info!("Connection '{}' closed before join", self.connection_id),
        }
    }

    async fn on_join(&mut self, raw_user_id: String) {
        if let Some(connection) = &self.connection {
            let message = format!("already joined as '{}'", connection.user_id);
            self.reply_error(message).await;
            return;
        }

        let user_id = match UserId::new(raw_user_id) {
            Ok(user_id) => user_id,
            Err(e) => {
                self.reply_error(e.to_string()).await;
                return;
            }
        };

        match self
            .state
            .join_queue_usecase
            .execute(self.connection_id, user_id)
            .await
        {
            // Pairing continues in the background; its outcome reaches the
            // client as `start` messages.
            Ok(outcome) => self.connection = Some(outcome.connection),
            Err(e) => self.reply_error(e.to_string()).await,
        }
    }

    async fn on_submission(&self, room_id: &str) {
        let Some(sender) = &self.connection else {
            self.reply_error(SubmissionError::RoomNotFound.to_string())
                .await;
            return;
        };

        if let Err(e) = self
            .state
            .relay_submission_usecase
            .execute(sender, room_id)
            .await
        {
            self.reply_error(e.to_string()).await;
        }
    }

    async fn on_verdict(&self, verdict: Verdict) {
        let Some(sender) = &self.connection else {
            tracing::debug!("Verdict before join on '{}' dropped", self.connection_id);
            return;
        };

        match self
            .state
            .report_verdict_usecase
            .execute(sender, verdict)
            .await
        {
            Ok(VerdictOutcome::Continued) => {}
            Ok(VerdictOutcome::Finished { room }) => {
                tracing::info!("Room '{}' finished", room.id);
            }
            Err(VerdictError::RoomNotFound) => {
                tracing::debug!("Verdict from '{}' without a room dropped", sender.user_id);
            }
        }
    }

    async fn reply_error(&self, message: impl Into<String>) {
        let event = SessionEvent::Error {
            message: message.into(),
        };
        if let Err(e) = self
            .state
            .message_pusher
            .push_to(&self.connection_id, &event)
            .await
        {
            tracing::debug!("Could not reply to '{}': {}", self.connection_id, e);
        }
    }
}
