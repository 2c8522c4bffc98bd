use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
  pub x: i32,
  pub y: i32,
}

impl Point {
  pub const fn new(x: i32, y: i32) -> Self {
    Self { x, y }
  }

  /// Shifts one cell in `direction`, wrapping both axes onto the torus.
  pub fn step(self, direction: Direction, width: i32, height: i32) -> Self {
    let (dx, dy) = direction.delta();
    Self {
      x: (self.x + dx).rem_euclid(width),
      y: (self.y + dy).rem_euclid(height),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Up,
  Down,
  Left,
  Right,
}

impl Direction {
  pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

  pub fn opposite(self) -> Self {
    match self {
      Direction::Up => Direction::Down,
      Direction::Down => Direction::Up,
      Direction::Left => Direction::Right,
      Direction::Right => Direction::Left,
    }
  }

  // Screen coordinates: y grows downward.
  pub fn delta(self) -> (i32, i32) {
    match self {
      Direction::Up => (0, -1),
      Direction::Down => (0, 1),
      Direction::Left => (-1, 0),
      Direction::Right => (1, 0),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeathReason {
  Eaten,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
  pub id: String,
  pub name: String,
  pub snake: Vec<Point>,
  pub color: String,
  pub score: u32,
  pub alive: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub death_reason: Option<DeathReason>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub killer_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateSnapshot {
  pub players: Vec<PlayerState>,
  pub foods: Vec<Point>,
  pub grid_width: i32,
  pub grid_height: i32,
}
