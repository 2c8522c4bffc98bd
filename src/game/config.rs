use super::constants::{GRID_HEIGHT, GRID_WIDTH, MAX_FOODS, MOVE_INTERVAL, TICK_MS};
use anyhow::{ensure, Context};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub grid_width: i32,
    pub grid_height: i32,
    pub max_foods: usize,
    pub tick_ms: u64,
    pub move_interval: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            max_foods: MAX_FOODS,
            tick_ms: TICK_MS,
            move_interval: MOVE_INTERVAL,
        }
    }
}

impl GameConfig {
    /// Builds a config from `GRID_WIDTH`, `GRID_HEIGHT`, `MAX_FOODS`, `TICK_MS` and
    /// `MOVE_INTERVAL`, falling back to the compiled-in defaults for unset variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let config = Self {
            grid_width: env_or("GRID_WIDTH", defaults.grid_width)?,
            grid_height: env_or("GRID_HEIGHT", defaults.grid_height)?,
            max_foods: env_or("MAX_FOODS", defaults.max_foods)?,
            tick_ms: env_or("TICK_MS", defaults.tick_ms)?,
            move_interval: env_or("MOVE_INTERVAL", defaults.move_interval)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.grid_width >= 3 && self.grid_height >= 3,
            "grid must be at least 3x3, got {}x{}",
            self.grid_width,
            self.grid_height
        );
        ensure!(self.tick_ms > 0, "tick period must be positive");
        ensure!(self.move_interval > 0, "move interval must be positive");
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {value:?}")),
        _ => Ok(default),
    }
}
