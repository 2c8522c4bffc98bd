use super::config::GameConfig;
use super::food::FoodManager;
use super::snake::Snake;
use super::types::{DeathReason, Direction, GameStateSnapshot, PlayerState, Point};
use crate::protocol;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc::{error::TrySendError, Sender};
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;

/// The authoritative simulation. All snake and food state lives behind one lock; the
/// tick loop and every public mutation take it independently.
#[derive(Debug)]
pub struct Game {
  config: GameConfig,
  world: RwLock<World>,
  broadcast_tx: Sender<String>,
}

#[derive(Debug)]
struct World {
  config: GameConfig,
  // Join order. Collision resolution walks this in order, so earlier joiners act first.
  snakes: Vec<Snake>,
  food: FoodManager,
}

impl Game {
  pub fn new(config: GameConfig, broadcast_tx: Sender<String>) -> Self {
    Self {
      config,
      world: RwLock::new(World::new(config)),
      broadcast_tx,
    }
  }

  /// Seeds the food and then ticks forever at the configured period.
  pub async fn run(self: Arc<Self>) {
    self.world.write().await.replenish_food();
    tracing::info!(
      tick_ms = self.config.tick_ms,
      move_interval = self.config.move_interval,
      grid_width = self.config.grid_width,
      grid_height = self.config.grid_height,
      "simulation started"
    );

    let mut interval = tokio::time::interval(self.config.tick_period());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
      interval.tick().await;
      self.tick().await;
    }
  }

  pub async fn tick(&self) {
    let snapshot = {
      let mut world = self.world.write().await;
      world.tick();
      world.snapshot()
    };
    self.broadcast(snapshot);
  }

  fn broadcast(&self, snapshot: GameStateSnapshot) {
    let payload = match protocol::encode_game_state(snapshot) {
      Ok(payload) => payload,
      Err(error) => {
        tracing::warn!(%error, "failed to encode game state, skipping broadcast");
        return;
      }
    };
    match self.broadcast_tx.try_send(payload) {
      Ok(()) => {}
      Err(TrySendError::Full(_)) => tracing::debug!("broadcast channel full, dropping tick"),
      Err(TrySendError::Closed(_)) => tracing::trace!("broadcast channel closed"),
    }
  }

  pub async fn add_player(&self, id: &str, name: &str) -> PlayerState {
    let mut world = self.world.write().await;
    world.add_player(id, name).to_player_state()
  }

  pub async fn remove_player(&self, id: &str) -> bool {
    let mut world = self.world.write().await;
    world.remove_player(id)
  }

  pub async fn update_direction(&self, id: &str, direction: Direction) {
    let mut world = self.world.write().await;
    if let Some(snake) = world.snake_mut(id) {
      snake.set_direction(direction);
    }
  }

  pub async fn snapshot(&self) -> GameStateSnapshot {
    self.world.read().await.snapshot()
  }

  pub async fn player_count(&self) -> usize {
    self.world.read().await.snakes.len()
  }
}

/// Length once this tick's pending tail removal is accounted for.
fn settled_len(snake: &Snake, tail_pending: bool) -> usize {
  snake.len().saturating_sub(usize::from(tail_pending))
}

impl World {
  fn new(config: GameConfig) -> Self {
    Self {
      config,
      snakes: Vec::new(),
      food: FoodManager::new(config.grid_width, config.grid_height, config.max_foods),
    }
  }

  fn add_player(&mut self, id: &str, name: &str) -> &Snake {
    let snake = Snake::new(id, name, self.config.grid_width, self.config.grid_height);
    let index = match self.snakes.iter().position(|existing| existing.id == id) {
      Some(index) => {
        self.snakes[index] = snake;
        index
      }
      None => {
        self.snakes.push(snake);
        self.snakes.len() - 1
      }
    };
    &self.snakes[index]
  }

  fn remove_player(&mut self, id: &str) -> bool {
    let before = self.snakes.len();
    self.snakes.retain(|snake| snake.id != id);
    self.snakes.len() != before
  }

  fn snake_mut(&mut self, id: &str) -> Option<&mut Snake> {
    self.snakes.iter_mut().find(|snake| snake.id == id)
  }

  fn occupied_cells(&self) -> HashSet<Point> {
    self
      .snakes
      .iter()
      .filter(|snake| snake.alive)
      .flat_map(|snake| snake.body.iter().copied())
      .collect()
  }

  fn replenish_food(&mut self) {
    let occupied = self.occupied_cells();
    self.food.ensure_minimum(&occupied);
  }

  fn tick(&mut self) {
    let width = self.config.grid_width;
    let height = self.config.grid_height;
    let move_interval = self.config.move_interval;

    let mut tail_pending = vec![false; self.snakes.len()];
    for (index, snake) in self.snakes.iter_mut().enumerate() {
      if !snake.alive {
        continue;
      }
      snake.move_counter += 1;
      if snake.move_counter < move_interval {
        continue;
      }
      snake.move_counter = 0;
      tail_pending[index] = snake.move_head(width, height).is_some();
    }

    if !tail_pending.contains(&true) {
      return;
    }

    for index in 0..self.snakes.len() {
      if tail_pending[index] && self.snakes[index].alive {
        self.resolve_move(index, &mut tail_pending);
      }
    }

    self.replenish_food();
  }

  fn resolve_move(&mut self, index: usize, tail_pending: &mut [bool]) {
    let Some(head) = self.snakes[index].head() else { return };

    if let Some(cut) = self.snakes[index].self_collision_index() {
      let removed = self.snakes[index].bite_off(cut);
      tracing::debug!(player_id = %self.snakes[index].id, removed, "snake bit its own tail");
    }

    let mut ate_opponent = false;
    if let Some(other) = self.first_opponent_at(index, head) {
      let own_len = settled_len(&self.snakes[index], tail_pending[index]);
      let other_len = settled_len(&self.snakes[other], tail_pending[other]);
      if own_len > other_len {
        // The corpse freezes at the length that was credited.
        if tail_pending[other] {
          self.snakes[other].remove_tail();
          tail_pending[other] = false;
        }
        let killer = self.snakes[index].name.clone();
        self.snakes[other].die(DeathReason::Eaten, Some(killer));
        self.snakes[index].score += other_len as u32;
        ate_opponent = true;
        tracing::debug!(
          player_id = %self.snakes[index].id,
          victim_id = %self.snakes[other].id,
          gained = other_len,
          "snake ate opponent"
        );
      } else {
        let killer = self.snakes[other].name.clone();
        self.snakes[index].die(DeathReason::Eaten, Some(killer));
        tail_pending[index] = false;
        tracing::debug!(
          player_id = %self.snakes[index].id,
          killer_id = %self.snakes[other].id,
          "snake was eaten"
        );
        return;
      }
    }

    let ate_food = self.food.remove(head);
    if ate_food {
      self.snakes[index].grow();
      let occupied = self.occupied_cells();
      self.food.spawn(&occupied);
    } else if !ate_opponent {
      self.snakes[index].remove_tail();
    }
    tail_pending[index] = false;
  }

  fn first_opponent_at(&self, index: usize, head: Point) -> Option<usize> {
    self
      .snakes
      .iter()
      .enumerate()
      .filter(|(other, snake)| *other != index && snake.alive)
      .find(|(_, snake)| snake.body.contains(&head))
      .map(|(other, _)| other)
  }

  fn snapshot(&self) -> GameStateSnapshot {
    GameStateSnapshot {
      players: self.snakes.iter().map(Snake::to_player_state).collect(),
      foods: self.food.foods().to_vec(),
      grid_width: self.config.grid_width,
      grid_height: self.config.grid_height,
    }
  }
}
