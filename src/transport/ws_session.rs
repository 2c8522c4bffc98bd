use crate::hub::{ClientHandle, HubHandle};
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::time::{interval_at, timeout, Instant};
use uuid::Uuid;

pub const MAX_MESSAGE_SIZE: usize = 512;
const WRITE_WAIT: Duration = Duration::from_secs(10);
const PONG_WAIT: Duration = Duration::from_secs(60);
// Must stay below PONG_WAIT so the peer's pong lands before our read deadline.
const PING_PERIOD: Duration = Duration::from_secs(54);

pub async fn handle_socket(socket: WebSocket, hub: HubHandle) {
    let (mut sender, mut receiver) = socket.split();
    let player_id = Uuid::new_v4().to_string();
    let (client, mut outbound_rx) = ClientHandle::new(player_id.clone());
    if !hub.register(client).await {
        return;
    }
    tracing::debug!(player_id = %player_id, "session opened");

    let mut send_task = tokio::spawn(async move {
        let mut ping = interval_at(Instant::now() + PING_PERIOD, PING_PERIOD);
        loop {
            let message = tokio::select! {
                payload = outbound_rx.recv() => match payload {
                    // A closed queue means the hub dropped us; skip the backlog.
                    Some(payload) if !outbound_rx.is_closed() => Message::Text(payload),
                    _ => {
                        let _ = timeout(WRITE_WAIT, sender.send(Message::Close(None))).await;
                        return;
                    }
                },
                _ = ping.tick() => Message::Ping(Vec::new()),
            };
            if !matches!(timeout(WRITE_WAIT, sender.send(message)).await, Ok(Ok(()))) {
                return;
            }
        }
    });

    let reader_hub = hub.clone();
    let reader_id = player_id.clone();
    let mut recv_task = tokio::spawn(async move {
        loop {
            let Ok(next) = timeout(PONG_WAIT, receiver.next()).await else {
                tracing::debug!(player_id = %reader_id, "read deadline elapsed");
                break;
            };
            let Some(Ok(message)) = next else { break };
            match message {
                Message::Text(text) => reader_hub.handle_text_message(&reader_id, &text).await,
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    hub.unregister(&player_id).await;
    tracing::debug!(player_id = %player_id, "session closed");
}
