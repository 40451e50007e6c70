use std::time::Duration;

use super::{cell::Cell, food::Food, grid::Grid, snake::Snake};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Over,
}

/// Everything that changes during one play: the snake, the apple, score and pace
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub grid: Grid,
    pub snake: Snake,
    pub food: Food,
    pub score: u32,
    pub interval: Duration,
    pub status: SessionStatus,
}

impl GameSession {
    pub fn new(grid: Grid, snake: Snake, food: Food, interval: Duration) -> Self {
        Self {
            grid,
            snake,
            food,
            score: 0,
            interval,
            status: SessionStatus::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    pub fn is_over(&self) -> bool {
        self.status == SessionStatus::Over
    }

    pub fn segments(&self) -> Vec<Cell> {
        self.snake.to_vec()
    }
}
