//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered events.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::{SubscriptionManager, WILDCARD};
use crate::api::dto::{AllowanceResponse, PoolResponse};
use crate::domain::{Address, LedgerEvent, PoolName};
use crate::service::LedgerService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<LedgerEvent>,
    ledger_service: Arc<LedgerService>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();
    tracing::debug!("ws connection opened");

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs, &ledger_service).await;
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(ledger_event) => {
                        if !subs.matches(&ledger_event) {
                            continue;
                        }
                        let msg = WsMessage::new(
                            uuid::Uuid::new_v4().to_string(),
                            WsMessageType::Event,
                            serde_json::to_value(&ledger_event).unwrap_or_default(),
                        );
                        let json = serde_json::to_string(&msg).unwrap_or_default();
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Splits raw names into valid pool names and a wildcard flag.
/// Invalid names are ignored.
fn parse_pool_names(raw: &[String]) -> (Vec<PoolName>, bool) {
    let mut wildcard = false;
    let mut names = Vec::new();
    for s in raw {
        if s == WILDCARD {
            wildcard = true;
        } else if let Ok(name) = PoolName::new(s.as_str()) {
            names.push(name);
        }
    }
    (names, wildcard)
}

/// Handles a text message from the client, returning an optional JSON response.
async fn handle_text_message(
    text: &str,
    subs: &mut SubscriptionManager,
    ledger_service: &LedgerService,
) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return serde_json::to_string(&WsMessage::error("", 400, "malformed JSON")).ok();
    };
    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return serde_json::to_string(&WsMessage::error(msg.id, 404, "unknown command")).ok();
    };

    let response = match command {
        WsCommand::Subscribe { pool_names } => {
            let (names, wildcard) = parse_pool_names(&pool_names);
            subs.subscribe(&names, wildcard);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "subscribed": names.iter().map(PoolName::as_str).collect::<Vec<_>>(),
                    "count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            )
        }
        WsCommand::Unsubscribe { pool_names } => {
            let (names, wildcard) = parse_pool_names(&pool_names);
            subs.unsubscribe(&names, wildcard);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "unsubscribed": names.iter().map(PoolName::as_str).collect::<Vec<_>>(),
                    "remaining_count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            )
        }
        WsCommand::GetPool { pool_name } => match ledger_service.get_pool(&pool_name).await {
            Some(pool) => WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::to_value(PoolResponse::from(&pool)).unwrap_or_default(),
            ),
            None => WsMessage::error(msg.id, 404, format!("pool not found: {pool_name}")),
        },
        WsCommand::GetAllowance { account } => match Address::parse(&account) {
            Ok(account) => {
                let allowance = ledger_service.get_allowance(&account).await;
                WsMessage::new(
                    msg.id,
                    WsMessageType::Response,
                    serde_json::to_value(AllowanceResponse {
                        account: account.to_string(),
                        allowance: allowance.to_string(),
                    })
                    .unwrap_or_default(),
                )
            }
            Err(e) => WsMessage::error(msg.id, 400, e.to_string()),
        },
    };
    serde_json::to_string(&response).ok()
}
