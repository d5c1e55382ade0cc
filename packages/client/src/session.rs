//! WebSocket client session management.

use std::sync::Arc;

use arena_server::infrastructure::dto::websocket::{ClientMessage, ServerMessage, WireId};
use arena_shared::time::get_timestamp;
use futures_util::{SinkExt, StreamExt};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::{
    command::Command,
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

/// Run the WebSocket client session
///
/// Connects, joins the queue under `user_id` and then relays prompt commands until
/// the duel ends or the user quits.
pub async fn run_client_session(url: &str, user_id: &str) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to duel server!");

    let (mut write, mut read) = ws_stream.split();

    let join = ClientMessage::Join {
        user_id: WireId::Text(user_id.to_string()),
    };
    write
        .send(Message::Text(serde_json::to_string(&join)?.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    print!("{}", MessageFormatter::format_welcome(user_id));

    // Room id from the latest `start`, used to fill `submission.roomId`
    let room_id: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));

    // Spawn a task to handle incoming messages
    let me = user_id.to_string();
    let room_id_for_read = room_id.clone();
    let mut read_task = tokio::spawn(async move {
        let mut finished = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match serde_json::from_str::<ServerMessage>(&text) {
                        Ok(server_message) => {
                            match &server_message {
                                ServerMessage::Start { room_id, .. } => {
                                    *room_id_for_read.lock().await = Some(room_id.clone());
                                }
                                ServerMessage::Winner { .. }
                                | ServerMessage::OpponentDisconnected => {
                                    *room_id_for_read.lock().await = None;
                                    finished = true;
                                }
                                _ => {}
                            }
                            MessageFormatter::format_server_message(
                                &server_message,
                                &me,
                                get_timestamp(),
                            )
                        }
                        Err(_) => Some(MessageFormatter::format_raw_message(&text)),
                    };

                    if let Some(formatted) = formatted {
                        print!("{}", formatted);
                        redisplay_prompt(&me);
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }

        finished
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let prompt = format!("{}> ", user_id);
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    tracing::info!("Input closed");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to turn prompt commands into protocol messages
    let me = user_id.to_string();
    let mut write_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            let message = match Command::parse(&line) {
                Ok(Command::Submit) => match room_id.lock().await.clone() {
                    Some(room_id) => ClientMessage::Submission { room_id },
                    None => {
                        print!("{}", MessageFormatter::format_error("no duel in progress"));
                        redisplay_prompt(&me);
                        continue;
                    }
                },
                Ok(Command::Verdict(verdict)) => ClientMessage::Verdict { verdict },
                Ok(Command::Quit) => return Ok(()),
                Err(e) => {
                    print!("{}", MessageFormatter::format_error(&e.to_string()));
                    redisplay_prompt(&me);
                    continue;
                }
            };

            let json = serde_json::to_string(&message)?;
            write
                .send(Message::Text(json.into()))
                .await
                .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
        }

        Ok::<(), ClientError>(())
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            if !read_result.unwrap_or(false) {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            write_result.map_err(|e| ClientError::ConnectionError(e.to_string()))??;
        }
    }

    Ok(())
}
