//! WebSocket Connection Handler
//!
//! One task per connection: gate on the registration frame, route into a
//! new or existing game, then feed every decoded frame to that game until
//! the remote side goes away.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::stream::SplitStream;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::domain::{ClientMessage, Game, Participant, ServerMessage};
use crate::shared::error::ConnectError;
use crate::startup::AppState;

/// Which session path the connection arrived on.
enum EntryPath {
    Create,
    Join(String),
}

/// Upgrade handler for `/create`: the connecting player becomes the admin
/// of a brand-new game.
pub async fn create_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    upgrade(ws, state, EntryPath::Create)
}

/// Upgrade handler for `/join/{name}`.
pub async fn join_handler(
    ws: WebSocketUpgrade,
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> Response {
    upgrade(ws, state, EntryPath::Join(name))
}

fn upgrade(ws: WebSocketUpgrade, state: AppState, entry: EntryPath) -> Response {
    ws.max_message_size(state.settings.websocket.max_message_size)
        .max_frame_size(state.settings.websocket.max_frame_size)
        .on_upgrade(move |socket| handle_socket(socket, state, entry))
}

/// Handle one WebSocket connection for its whole lifetime.
async fn handle_socket(socket: WebSocket, state: AppState, entry: EntryPath) {
    let (mut sink, mut stream) = socket.split();

    // Writer task drains the participant's channel, so a stalled remote
    // never blocks game processing or other connections.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(t) => t,
                Err(e) => {
                    tracing::error!("Failed to serialize outbound message: {}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // The first frame must be a registration; anything else gets a single
    // error frame and the connection path ends with no participant.
    let display_name = match await_registration(&mut stream).await {
        Some(name) => name,
        None => {
            tracing::debug!("Connection rejected: invalid registration");
            let _ = tx.send(ConnectError::InvalidRegistration.to_message());
            drop(tx); // lets the writer flush and finish
            let _ = writer.await;
            return;
        }
    };

    let participant = Participant::new(display_name.clone(), tx.clone());
    let participant_id = participant.id();
    tracing::debug!(%participant_id, name = %display_name, "Participant registered");

    if tx.send(ServerMessage::UserInfo { id: participant_id }).is_err() {
        writer.abort();
        return;
    }

    // Route into a game. The participant is moved in; it belongs to that
    // game for the rest of its lifetime.
    let game: Arc<Game> = match entry {
        EntryPath::Create => {
            let game = state.registry.create(participant);
            tracing::info!(game = %game.name(), admin = %participant_id, "Game created");
            game.broadcast_game_info();
            game
        }
        EntryPath::Join(name) => {
            let Some(game) = state.registry.lookup(&name) else {
                tracing::debug!(game = %name, %participant_id, "Join failed: unknown game");
                drop(participant);
                let _ = tx.send(ConnectError::GameNotFound.to_message());
                drop(tx);
                let _ = writer.await;
                return;
            };
            if game.join(participant).is_err() {
                // Already running or finished; to the client this looks the
                // same as a game that never existed.
                tracing::debug!(game = %name, %participant_id, "Join failed: game not in lobby");
                let _ = tx.send(ConnectError::GameNotFound.to_message());
                drop(tx);
                let _ = writer.await;
                return;
            }
            tracing::info!(game = %game.name(), %participant_id, "Participant joined");
            game
        }
    };

    // Read loop: decode and hand everything to the game. Undecodable
    // frames are dropped, never answered, and never tear the session down.
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Register { .. }) => {
                    tracing::debug!(%participant_id, "Ignoring repeated register frame");
                }
                Ok(msg) => game.process(participant_id, msg),
                Err(e) => {
                    tracing::debug!(%participant_id, error = %e, "Dropping undecodable frame");
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {
                // Ping/pong are answered by axum; binary frames are not
                // part of the protocol.
            }
            Err(e) => {
                tracing::debug!(%participant_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    // The participant stays on the roster so indices and broadcast
    // semantics are preserved; later sends to it simply fail and are
    // isolated per recipient.
    writer.abort();
    tracing::info!(game = %game.name(), %participant_id, "Participant disconnected");
}

/// Wait for the mandatory `register` frame.
///
/// Returns the display name, or `None` when the first meaningful frame is
/// anything else or the connection closes first.
async fn await_registration(stream: &mut SplitStream<WebSocket>) -> Option<String> {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                return match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Register { name }) => Some(name),
                    _ => None,
                };
            }
            Ok(Message::Close(_)) | Err(_) => return None,
            Ok(_) => continue,
        }
    }
    None
}
