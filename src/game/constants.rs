pub const GRID_WIDTH: i32 = 50;
pub const GRID_HEIGHT: i32 = 50;
pub const MAX_FOODS: usize = 10;
pub const TICK_MS: u64 = 50;
pub const MOVE_INTERVAL: u32 = 3;
pub const STARTING_LENGTH: usize = 3;
pub const SPAWN_MARGIN: i32 = 5;
pub const MAX_FOOD_SPAWN_ATTEMPTS: usize = 100;
pub const DEFAULT_PLAYER_NAME: &str = "Player";

pub const COLOR_POOL: [&str; 15] = [
  "#FF6B6B",
  "#4ECDC4",
  "#45B7D1",
  "#FFA07A",
  "#98D8C8",
  "#F7DC6F",
  "#BB8FCE",
  "#85C1E2",
  "#F8B195",
  "#C06C84",
  "#6C5B7B",
  "#F67280",
  "#355C7D",
  "#99B898",
  "#FECEAB",
];
