use axum::{
  extract::{State, WebSocketUpgrade},
  http::Method,
  response::IntoResponse,
  routing::get,
  Json, Router,
};
use serde::Serialize;
use std::env;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

mod game;
mod hub;
mod protocol;
mod shared;
mod transport;

use game::config::GameConfig;
use game::engine::Game;
use hub::{Hub, HubHandle, BROADCAST_CAPACITY};
use transport::ws_session::{handle_socket, MAX_MESSAGE_SIZE};

#[derive(Clone)]
struct AppState {
  hub: HubHandle,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
  ok: bool,
  players: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let config = GameConfig::from_env()?;
  let (broadcast_tx, broadcast_rx) = mpsc::channel(BROADCAST_CAPACITY);
  let game = Arc::new(Game::new(config, broadcast_tx));
  let (hub, hub_handle) = Hub::new(Arc::clone(&game), broadcast_rx);
  tokio::spawn(hub.run());
  tokio::spawn(Arc::clone(&game).run());

  let state = Arc::new(AppState { hub: hub_handle });

  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET])
    .allow_headers(Any);

  let mut app: Router<Arc<AppState>> = Router::new()
    .route("/api/health", get(health))
    .route("/api/state", get(game_state))
    .route("/ws", get(ws_handler))
    .layer(cors);

  if let Some(static_dir) = env::var("STATIC_DIR")
    .ok()
    .map(|value| value.trim().to_string())
    .filter(|value| !value.is_empty())
  {
    tracing::info!(static_dir = %static_dir, "serving static files");
    app = app.fallback_service(ServeDir::new(static_dir));
  }

  let app: Router = app.with_state(state);

  let port: u16 = env::var("PORT")
    .ok()
    .and_then(|value| value.parse().ok())
    .unwrap_or(8080);

  let address = format!("0.0.0.0:{port}");
  tracing::info!("listening on {address}");

  let listener = tokio::net::TcpListener::bind(&address).await?;
  axum::serve(listener, app).await?;

  Ok(())
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthResponse {
    ok: true,
    players: state.hub.game().player_count().await,
  })
}

async fn game_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(state.hub.game().snapshot().await)
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let hub = state.hub.clone();
  ws.max_message_size(MAX_MESSAGE_SIZE)
    .on_upgrade(move |socket| handle_socket(socket, hub))
}
