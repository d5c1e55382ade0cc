//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionId, MessagePusher, PushFrame, SessionEvent},
    ui::{session::SessionProtocolHandler, state::AppState},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the connection's outbound channel into the WebSocket sink.
///
/// The task ends after forwarding a `Close` frame, or when the peer can no longer
/// be written to.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<PushFrame>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                PushFrame::Text(text) => {
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                PushFrame::Close => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    })
}

/// Spawns a task that pushes `ping` through the outbound channel at a fixed interval.
///
/// Stops as soon as the connection is no longer registered with the pusher.
fn keepalive_loop(
    message_pusher: Arc<dyn MessagePusher>,
    connection_id: ConnectionId,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if message_pusher
                .push_to(&connection_id, &SessionEvent::Ping)
                .await
                .is_err()
            {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive outbound frames
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .message_pusher
        .register_client(connection_id, tx)
        .await;
    tracing::info!("Connection '{}' accepted", connection_id);

    let mut send_task = pusher_loop(rx, sender);
    let keepalive_task = state.keepalive_interval.map(|interval| {
        keepalive_loop(state.message_pusher.clone(), connection_id, interval)
    });

    let mut handler = SessionProtocolHandler::new(state.clone(), connection_id);

    // Handling runs in the branch body, never cancelled by the send task.
    loop {
        tokio::select! {
            msg = receiver.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    tracing::debug!("Received text on '{}': {}", connection_id, text.as_str());
                    handler.handle_text(text.as_str()).await;
                }
                Some(Ok(Message::Binary(_))) => handler.handle_binary().await,
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Connection '{}' closed by peer", connection_id);
                    break;
                }
                Some(Ok(_)) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            },
            _ = &mut send_task => {
                tracing::info!("Connection '{}' closed by server", connection_id);
                break;
            }
        }
    }

    send_task.abort();
    if let Some(task) = keepalive_task {
        task.abort();
    }

    handler.terminate().await;
}
