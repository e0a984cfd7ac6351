//! Live-server WebSocket tests: subscribe, trigger a REST mutation, and
//! receive the resulting ledger event.

#![allow(clippy::panic)]

mod common;

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

use common::{Harness, OWNER, TOKEN};

type Socket =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn spawn_server(h: &Harness) -> SocketAddr {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    let app = h.app.clone();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

async fn connect(addr: SocketAddr) -> Socket {
    let Ok((socket, _)) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws")).await else {
        panic!("ws connect failed");
    };
    socket
}

async fn send_command(socket: &mut Socket, id: &str, payload: Value) {
    let msg = json!({
        "id": id,
        "type": "command",
        "timestamp": chrono::Utc::now(),
        "payload": payload,
    });
    let Ok(()) = socket.send(Message::text(msg.to_string())).await else {
        panic!("ws send failed");
    };
}

async fn next_json(socket: &mut Socket) -> Value {
    loop {
        let Ok(Some(Ok(msg))) = tokio::time::timeout(Duration::from_secs(5), socket.next()).await
        else {
            panic!("no ws message within timeout");
        };
        if let Message::Text(text) = msg {
            let Ok(value) = serde_json::from_str::<Value>(text.as_str()) else {
                panic!("ws message is not JSON");
            };
            return value;
        }
    }
}

async fn post_pool(addr: SocketAddr, name: &str) {
    let Ok(response) = reqwest::Client::new()
        .post(format!("http://{addr}/api/v1/pools"))
        .header("x-account-id", OWNER)
        .json(&json!({ "name": name, "asset": TOKEN, "price_per_unit": "100" }))
        .send()
        .await
    else {
        panic!("http request failed");
    };
    assert_eq!(response.status().as_u16(), 201);
}

#[tokio::test]
async fn subscriber_receives_pool_created() {
    let h = Harness::new();
    let addr = spawn_server(&h).await;
    let mut socket = connect(addr).await;

    send_command(
        &mut socket,
        "sub-1",
        json!({ "command": "subscribe", "pool_names": ["tokenPool"] }),
    )
    .await;
    let ack = next_json(&mut socket).await;
    assert_eq!(ack["type"], "response");
    assert_eq!(ack["id"], "sub-1");
    assert_eq!(ack["payload"]["count"], 1);

    post_pool(addr, "otherPool").await;
    post_pool(addr, "tokenPool").await;

    let event = next_json(&mut socket).await;
    assert_eq!(event["type"], "event");
    assert_eq!(event["payload"]["event_type"], "pool_created");
    assert_eq!(event["payload"]["pool"], "tokenPool");
    assert_eq!(event["payload"]["owner"], OWNER);
}

#[tokio::test]
async fn get_pool_command_returns_record() {
    let h = Harness::new();
    let addr = spawn_server(&h).await;
    post_pool(addr, "tokenPool").await;
    let mut socket = connect(addr).await;

    send_command(
        &mut socket,
        "q-1",
        json!({ "command": "get_pool", "pool_name": "tokenPool" }),
    )
    .await;
    let response = next_json(&mut socket).await;
    assert_eq!(response["type"], "response");
    assert_eq!(response["payload"]["name"], "tokenPool");
    assert_eq!(response["payload"]["size"], "0");

    send_command(
        &mut socket,
        "q-2",
        json!({ "command": "get_pool", "pool_name": "missing" }),
    )
    .await;
    let response = next_json(&mut socket).await;
    assert_eq!(response["type"], "error");
    assert_eq!(response["payload"]["code"], 404);
}

#[tokio::test]
async fn malformed_and_unknown_commands_error() {
    let h = Harness::new();
    let addr = spawn_server(&h).await;
    let mut socket = connect(addr).await;

    let Ok(()) = socket.send(Message::text("not json")).await else {
        panic!("ws send failed");
    };
    let response = next_json(&mut socket).await;
    assert_eq!(response["type"], "error");
    assert_eq!(response["payload"]["code"], 400);

    send_command(&mut socket, "x", json!({ "command": "swap" })).await;
    let response = next_json(&mut socket).await;
    assert_eq!(response["type"], "error");
    assert_eq!(response["payload"]["code"], 404);
}
