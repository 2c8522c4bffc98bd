pub mod config;
pub mod constants;
pub mod engine;
pub mod food;
pub mod snake;
pub mod types;
