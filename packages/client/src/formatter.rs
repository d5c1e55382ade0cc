//! Message formatting utilities for client display.

use arena_server::infrastructure::dto::websocket::ServerMessage;
use arena_shared::time::timestamp_to_rfc3339;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format any server message for display
    ///
    /// # Arguments
    ///
    /// * `message` - The decoded server message
    /// * `me` - The current user's id (to tell "you" from the opponent)
    /// * `received_at` - Unix timestamp when the message arrived (milliseconds)
    ///
    /// # Returns
    ///
    /// The text to print, or `None` for keep-alive pings
    pub fn format_server_message(
        message: &ServerMessage,
        me: &str,
        received_at: i64,
    ) -> Option<String> {
        let formatted = match message {
            ServerMessage::Start {
                room_id,
                problem_id,
                opponent,
            } => Self::format_start(room_id, *problem_id, opponent, received_at),
            ServerMessage::Submission { from } => Self::format_submission(from, received_at),
            ServerMessage::Verdict { from, verdict } => {
                Self::format_verdict(from, verdict, received_at)
            }
            ServerMessage::Winner { winner } => Self::format_winner(winner, me),
            ServerMessage::OpponentDisconnected => Self::format_opponent_disconnected(),
            ServerMessage::Error { message } => Self::format_error(message),
            ServerMessage::Ping => return None,
        };
        Some(formatted)
    }

    /// Format the duel start banner
    pub fn format_start(
        room_id: &str,
        problem_id: i64,
        opponent: &str,
        started_at: i64,
    ) -> String {
        format!(
            "\n\n{rule}\n\
             Duel started against {opponent}\n\
             problem: {problem_id}\n\
             room:    {room_id}\n\
             started at {time}\n\
             {rule}\n",
            rule = RULE,
            opponent = opponent,
            problem_id = problem_id,
            room_id = room_id,
            time = timestamp_to_rfc3339(started_at),
        )
    }

    pub fn format_submission(from: &str, received_at: i64) -> String {
        format!(
            "\n@{} submitted at {}\n",
            from,
            timestamp_to_rfc3339(received_at)
        )
    }

    pub fn format_verdict(from: &str, verdict: &str, received_at: i64) -> String {
        format!(
            "\n@{} got {} at {}\n",
            from,
            verdict,
            timestamp_to_rfc3339(received_at)
        )
    }

    /// Format the final result
    pub fn format_winner(winner: &str, me: &str) -> String {
        let headline = if winner == me {
            "You won!".to_string()
        } else {
            format!("{} won.", winner)
        };
        format!("\n\n{rule}\n{headline}\n{rule}\n", rule = RULE, headline = headline)
    }

    pub fn format_opponent_disconnected() -> String {
        "\nYour opponent disconnected. The duel is over.\n".to_string()
    }

    pub fn format_error(message: &str) -> String {
        format!("\n! {}\n", message)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    /// Format the welcome text with the available commands
    pub fn format_welcome(me: &str) -> String {
        format!(
            "\nYou are '{}'. Waiting for an opponent...\n\
             Commands: submit | verdict <VALUE> | quit\n\n",
            me
        )
    }
}
