//! Grid Snake - a single-player snake game played in the terminal
//!
//! This library provides:
//! - Core game rules: grid, snake, apple, engine (game module)
//! - The tick-driven game loop controller and its scheduler (controller module)
//! - Renderer abstraction with a ratatui implementation (render module)
//! - Keyboard mapping (input module)
//! - Interactive play (modes module)

pub mod controller;
pub mod game;
pub mod input;
pub mod modes;
pub mod render;
