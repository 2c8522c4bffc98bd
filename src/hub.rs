use crate::game::constants::DEFAULT_PLAYER_NAME;
use crate::game::engine::Game;
use crate::protocol::{self, ClientMessage};
use crate::shared::names::sanitize_player_name;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Per-connection outbound queue depth. A client this far behind is evicted.
pub const CLIENT_QUEUE_CAPACITY: usize = 256;
/// Depth of the engine-to-hub snapshot channel.
pub const BROADCAST_CAPACITY: usize = 256;
const MEMBERSHIP_CAPACITY: usize = 64;

#[derive(Debug)]
struct JoinRequest {
    player_id: String,
    name: String,
}

/// A connection as seen by the hub. Dropping the hub's copy closes the session's queue.
#[derive(Debug)]
pub struct ClientHandle {
    pub player_id: String,
    outbound: mpsc::Sender<String>,
}

impl ClientHandle {
    pub fn new(player_id: String) -> (Self, mpsc::Receiver<String>) {
        Self::with_capacity(player_id, CLIENT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(player_id: String, capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (outbound, receiver) = mpsc::channel(capacity);
        (Self { player_id, outbound }, receiver)
    }
}

/// Single-task dispatcher that owns the connection set. Membership changes and fan-out
/// are serialized through its event loop, so the set itself needs no lock.
#[derive(Debug)]
pub struct Hub {
    game: Arc<Game>,
    clients: HashMap<String, mpsc::Sender<String>>,
    register_rx: mpsc::Receiver<ClientHandle>,
    unregister_rx: mpsc::Receiver<String>,
    join_rx: mpsc::Receiver<JoinRequest>,
    broadcast_rx: mpsc::Receiver<String>,
}

#[derive(Debug, Clone)]
pub struct HubHandle {
    game: Arc<Game>,
    register_tx: mpsc::Sender<ClientHandle>,
    unregister_tx: mpsc::Sender<String>,
    join_tx: mpsc::Sender<JoinRequest>,
}

impl Hub {
    pub fn new(game: Arc<Game>, broadcast_rx: mpsc::Receiver<String>) -> (Self, HubHandle) {
        let (register_tx, register_rx) = mpsc::channel(MEMBERSHIP_CAPACITY);
        let (unregister_tx, unregister_rx) = mpsc::channel(MEMBERSHIP_CAPACITY);
        let (join_tx, join_rx) = mpsc::channel(MEMBERSHIP_CAPACITY);
        let handle = HubHandle {
            game: Arc::clone(&game),
            register_tx,
            unregister_tx,
            join_tx,
        };
        let hub = Self {
            game,
            clients: HashMap::new(),
            register_rx,
            unregister_rx,
            join_rx,
            broadcast_rx,
        };
        (hub, handle)
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                Some(client) = self.register_rx.recv() => self.register(client),
                Some(player_id) = self.unregister_rx.recv() => self.unregister(&player_id).await,
                Some(request) = self.join_rx.recv() => self.join(request).await,
                Some(payload) = self.broadcast_rx.recv() => self.fan_out(payload).await,
                else => break,
            }
        }
        tracing::info!("hub stopped");
    }

    fn register(&mut self, client: ClientHandle) {
        tracing::debug!(player_id = %client.player_id, "client registered");
        self.clients.insert(client.player_id, client.outbound);
    }

    async fn unregister(&mut self, player_id: &str) {
        if self.clients.remove(player_id).is_some() {
            tracing::debug!(player_id, "client unregistered");
        }
        // Always purge the entity: a join can race an earlier eviction.
        if self.game.remove_player(player_id).await {
            tracing::info!(player_id, "player left");
        }
    }

    /// Only a connection the hub still holds may own a snake.
    async fn join(&mut self, request: JoinRequest) {
        if !self.clients.contains_key(&request.player_id) {
            tracing::debug!(player_id = %request.player_id, "join from unregistered client ignored");
            return;
        }
        self.game.add_player(&request.player_id, &request.name).await;
        tracing::info!(player_id = %request.player_id, name = %request.name, "player joined");
    }

    async fn fan_out(&mut self, payload: String) {
        let mut evicted = Vec::new();
        for (player_id, outbound) in &self.clients {
            match outbound.try_send(payload.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::debug!(player_id = %player_id, "outbound queue full, evicting client");
                    evicted.push(player_id.clone());
                }
                Err(TrySendError::Closed(_)) => evicted.push(player_id.clone()),
            }
        }
        for player_id in evicted {
            self.clients.remove(&player_id);
            self.game.remove_player(&player_id).await;
        }
    }
}

impl HubHandle {
    pub fn game(&self) -> &Arc<Game> {
        &self.game
    }

    /// Returns false once the hub has shut down.
    pub async fn register(&self, client: ClientHandle) -> bool {
        self.register_tx.send(client).await.is_ok()
    }

    pub async fn unregister(&self, player_id: &str) {
        let _ = self.unregister_tx.send(player_id.to_string()).await;
    }

    pub async fn handle_text_message(&self, player_id: &str, text: &str) {
        let Some(message) = protocol::decode_client_message(text) else { return };
        match message {
            ClientMessage::Join { player_name } => {
                let name = sanitize_player_name(player_name.as_deref().unwrap_or_default(), DEFAULT_PLAYER_NAME);
                let request = JoinRequest {
                    player_id: player_id.to_string(),
                    name,
                };
                let _ = self.join_tx.send(request).await;
            }
            ClientMessage::Direction { direction } => {
                self.game.update_direction(player_id, direction).await;
            }
        }
    }
}
