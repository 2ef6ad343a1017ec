//! Live viewer lists for one slot over WebSocket
//!
//! `GET /api/v1/presence/ws?token=..&venue_id=..&table_id=..&date=..&time=..&viewing=true`
//!
//! The token travels in the query string because browsers cannot set
//! headers on a WebSocket handshake. With `viewing=true` the connection
//! also holds a viewing session for the caller, kept fresh until the
//! socket closes.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::select;
use tracing::{debug, info, warn};

use crate::domain::SlotKey;
use crate::interfaces::http::middleware::{authenticate_token, AuthError, AuthenticatedUser};
use crate::interfaces::http::modules::presence::{slot_key, ViewerListDto};
use crate::interfaces::http::state::ApiState;

#[derive(Debug, Deserialize)]
pub struct PresenceWsQuery {
    pub token: Option<String>,
    pub venue_id: String,
    pub table_id: String,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub viewing: bool,
}

pub async fn presence_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<ApiState>,
    Query(query): Query<PresenceWsQuery>,
) -> Response {
    let user = match query.token.as_deref() {
        Some(token) => match authenticate_token(token, &state.jwt_config) {
            Ok(user) => user,
            Err(e) => return e.into_response(),
        },
        None => return AuthError::MissingToken.into_response(),
    };

    let slot = match slot_key(&query.venue_id, &query.table_id, query.date, &query.time) {
        Ok(slot) => slot,
        Err(e) => return e.into_response(),
    };

    info!(user = %user.username, slot = %slot, viewing = query.viewing, "Presence watch opened");
    ws.on_upgrade(move |socket| handle_presence_socket(socket, state, user, slot, query.viewing))
}

fn viewers_frame(slot: &SlotKey, viewers: &[crate::domain::SlotPresence]) -> Option<Message> {
    let payload = serde_json::json!({
        "type": "viewers",
        "data": ViewerListDto::new(slot, viewers),
    });
    match serde_json::to_string(&payload) {
        Ok(text) => Some(Message::Text(text.into())),
        Err(e) => {
            warn!(error = %e, "Failed to serialize viewer list");
            None
        }
    }
}

async fn handle_presence_socket(
    socket: WebSocket,
    state: ApiState,
    user: AuthenticatedUser,
    slot: SlotKey,
    viewing: bool,
) {
    let (mut sender, mut receiver) = socket.split();

    let session = viewing.then(|| state.presence.start_session(user.user_id.clone(), slot.clone()));
    let mut watch = state.presence.watch(slot.clone(), Some(user.user_id.clone()));

    let initial = state
        .presence
        .list_viewers(&slot, Some(&user.user_id))
        .await;
    let mut open = match viewers_frame(&slot, &initial) {
        Some(frame) => sender.send(frame).await.is_ok(),
        None => true,
    };

    while open {
        select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        open = sender.send(Message::Pong(data)).await.is_ok();
                    }
                    Some(Ok(Message::Close(_))) | None => open = false,
                    Some(Err(e)) => {
                        debug!(error = %e, "Presence socket error");
                        open = false;
                    }
                    Some(Ok(_)) => {}
                }
            }
            viewers = watch.changed() => {
                match viewers {
                    Some(viewers) => {
                        if let Some(frame) = viewers_frame(&slot, &viewers) {
                            open = sender.send(frame).await.is_ok();
                        }
                    }
                    None => open = false,
                }
            }
        }
    }

    drop(watch);
    if let Some(session) = session {
        session.close().await;
    }
    info!(user = %user.username, slot = %slot, "Presence watch closed");
}
