//! Core game rules for Snake
//!
//! Everything here is free of I/O: the grid, the snake, the apple and the
//! engine that advances a session by one tick. Rendering, input and timing
//! live in the controller and the front-end modules.

pub mod cell;
pub mod config;
pub mod direction;
pub mod engine;
pub mod food;
pub mod grid;
pub mod session;
pub mod snake;

// Re-export commonly used types
pub use cell::Cell;
pub use config::{ConfigError, GameConfig};
pub use direction::Direction;
pub use engine::{GameEngine, StepInfo, StepResult};
pub use food::Food;
pub use grid::Grid;
pub use session::{GameSession, SessionStatus};
pub use snake::{Collision, Snake};
