//! WebSocket upgrade handler

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::game::ids::PlayerId;
use crate::game::{Outbound, ServerHandle, SessionEvent};
use crate::util::rate_limit::SessionRateLimiter;
use crate::util::time::unix_millis;
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle the upgraded WebSocket connection: one socket is one player
async fn handle_socket(socket: WebSocket, state: AppState) {
    let player_id = Uuid::new_v4();
    info!(player_id = %player_id, "New WebSocket connection");

    let (mut ws_sink, ws_stream) = socket.split();

    let welcome = ServerMsg::Welcome {
        player_id,
        server_time: unix_millis(),
    };
    if let Err(e) = send_msg(&mut ws_sink, &welcome).await {
        error!(player_id = %player_id, error = %e, "Failed to send welcome");
        return;
    }

    state.sessions.register(player_id);

    // Subscribe before joining so the initial state reaches us
    let events_rx = state.game.subscribe();
    if state.game.send(player_id, SessionEvent::Connected).await {
        run_session(player_id, ws_sink, ws_stream, &state.game, events_rx).await;
        state.game.send(player_id, SessionEvent::Disconnected).await;
    } else {
        error!(player_id = %player_id, "Simulation loop unavailable");
    }

    let duration_ms = state
        .sessions
        .unregister(&player_id)
        .map(|session| session.duration_ms(unix_millis()))
        .unwrap_or(0);
    info!(player_id = %player_id, duration_ms, "WebSocket connection closed");
}

/// Run the WebSocket session with read/write split
async fn run_session(
    player_id: PlayerId,
    mut ws_sink: SplitSink<WebSocket, Message>,
    mut ws_stream: SplitStream<WebSocket>,
    game: &ServerHandle,
    mut events_rx: broadcast::Receiver<Outbound>,
) {
    let rate_limiter = SessionRateLimiter::new();

    // Writer task: simulation broadcasts -> WebSocket
    let mut writer_handle = tokio::spawn(async move {
        loop {
            match events_rx.recv().await {
                Ok(outbound) => {
                    if !outbound.audience.includes(player_id) {
                        continue;
                    }
                    if let Err(e) = send_msg(&mut ws_sink, &outbound.msg).await {
                        debug!(player_id = %player_id, error = %e, "WebSocket send failed");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(
                        player_id = %player_id,
                        lagged_count = n,
                        "Client lagged, skipping {} messages", n
                    );
                    // Continue - the next aggregate update resyncs the client
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!(player_id = %player_id, "Event channel closed");
                    break;
                }
            }
        }
    });

    // Reader loop: WebSocket -> simulation loop
    loop {
        let result = tokio::select! {
            next = ws_stream.next() => match next {
                Some(result) => result,
                None => break,
            },
            _ = &mut writer_handle => {
                debug!(player_id = %player_id, "Writer finished, closing session");
                break;
            }
        };

        match result {
            Ok(Message::Text(text)) => {
                if !rate_limiter.check_input() {
                    debug!(player_id = %player_id, "Rate limited input message");
                    continue;
                }

                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(client_msg) => {
                        if !game.send(player_id, SessionEvent::Message(client_msg)).await {
                            debug!(player_id = %player_id, "Input channel closed");
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(player_id = %player_id, error = %e, "Failed to parse client message");
                    }
                }
            }
            Ok(Message::Binary(_)) => {
                warn!(player_id = %player_id, "Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                info!(player_id = %player_id, "Client initiated close");
                break;
            }
            Err(e) => {
                error!(player_id = %player_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    writer_handle.abort();
}

/// Send a message over WebSocket
async fn send_msg(sink: &mut SplitSink<WebSocket, Message>, msg: &ServerMsg) -> Result<(), String> {
    let json = serde_json::to_string(msg).map_err(|e| e.to_string())?;
    sink.send(Message::Text(json))
        .await
        .map_err(|e| e.to_string())
}
