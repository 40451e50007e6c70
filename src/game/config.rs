use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{cell::Cell, direction::Direction, grid::Grid};

pub const CELL_SIZE: u32 = 10;
pub const SURFACE_WIDTH: u32 = 400;
pub const SURFACE_HEIGHT: u32 = 400;
pub const BASE_INTERVAL_MS: u64 = 100;
pub const INTERVAL_STEP_MS: u64 = 100;
pub const MIN_INTERVAL_MS: u64 = 100;
pub const INITIAL_SEGMENTS: [Cell; 3] = [Cell::new(7, 5), Cell::new(6, 5), Cell::new(5, 5)];
pub const INITIAL_FOOD: Cell = Cell::new(10, 10);
pub const SNAKE_PALETTE: [&str; 3] = ["toughGreen", "lightBlue", "Green"];
pub const FOOD_COLOR: &str = "LimeGreen";
pub const BORDER_COLOR: &str = "Grey";

/// Every cell takes two terminal columns, so the row must fit a `u16` twice over
pub const MAX_GRID_WIDTH: i32 = (u16::MAX / 2) as i32;
pub const MAX_GRID_HEIGHT: i32 = u16::MAX as i32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("cell size must be positive")]
    ZeroCellSize,
    #[error("grid of {width}x{height} cells has no interior")]
    GridTooSmall { width: i32, height: i32 },
    #[error("grid of {width}x{height} cells exceeds the {max_width}x{max_height} limit")]
    GridTooLarge {
        width: i32,
        height: i32,
        max_width: i32,
        max_height: i32,
    },
    #[error("tick intervals must be positive")]
    ZeroInterval,
    #[error("minimum interval {min_ms}ms exceeds base interval {base_ms}ms")]
    FloorAboveBase { min_ms: u64, base_ms: u64 },
    #[error("starting snake needs at least one segment")]
    EmptySnake,
    #[error("starting cell ({col}, {row}) is outside the playable interior")]
    StartOnBorder { col: i32, row: i32 },
    #[error("starting cell ({col}, {row}) is occupied twice")]
    StartOverlap { col: i32, row: i32 },
    #[error("starting segment ({col}, {row}) does not touch the one before it")]
    StartNotContiguous { col: i32, row: i32 },
    #[error("snake palette must contain at least one color")]
    EmptyPalette,
}

/// Startup configuration for a game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Drawing surface width in surface units
    pub surface_width: u32,
    /// Drawing surface height in surface units
    pub surface_height: u32,
    /// Edge length of one cell in surface units
    pub cell_size: u32,

    /// Tick interval at the start of a session
    pub base_interval_ms: u64,
    /// How much each eaten apple shortens the interval
    pub interval_step_ms: u64,
    /// The interval never drops below this
    pub min_interval_ms: u64,

    /// Snake body at the start, head first
    pub initial_segments: Vec<Cell>,
    pub initial_direction: Direction,
    pub initial_food: Cell,

    /// Segment colors, cycled from the head
    pub snake_palette: Vec<String>,
    pub food_color: String,
    pub border_color: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            surface_width: SURFACE_WIDTH,
            surface_height: SURFACE_HEIGHT,
            cell_size: CELL_SIZE,
            base_interval_ms: BASE_INTERVAL_MS,
            interval_step_ms: INTERVAL_STEP_MS,
            min_interval_ms: MIN_INTERVAL_MS,
            initial_segments: INITIAL_SEGMENTS.to_vec(),
            initial_direction: Direction::Right,
            initial_food: INITIAL_FOOD,
            snake_palette: SNAKE_PALETTE.iter().map(|c| c.to_string()).collect(),
            food_color: FOOD_COLOR.to_string(),
            border_color: BORDER_COLOR.to_string(),
        }
    }
}

impl GameConfig {
    /// Create a configuration for a surface of the given size
    pub fn new(surface_width: u32, surface_height: u32) -> Self {
        Self {
            surface_width,
            surface_height,
            ..Default::default()
        }
    }

    /// Load overrides from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn grid(&self) -> Grid {
        Grid::from_surface(self.surface_width, self.surface_height, self.cell_size)
    }

    pub fn base_interval(&self) -> Duration {
        Duration::from_millis(self.base_interval_ms)
    }

    pub fn interval_step(&self) -> Duration {
        Duration::from_millis(self.interval_step_ms)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// The interval after one more speed-up, saturating at the floor
    pub fn next_interval(&self, current: Duration) -> Duration {
        current
            .saturating_sub(self.interval_step())
            .max(self.min_interval())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        let grid = self.grid();
        if !grid.has_interior() {
            return Err(ConfigError::GridTooSmall {
                width: grid.width(),
                height: grid.height(),
            });
        }
        if grid.width() > MAX_GRID_WIDTH || grid.height() > MAX_GRID_HEIGHT {
            return Err(ConfigError::GridTooLarge {
                width: grid.width(),
                height: grid.height(),
                max_width: MAX_GRID_WIDTH,
                max_height: MAX_GRID_HEIGHT,
            });
        }
        if self.base_interval_ms == 0 || self.min_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.min_interval_ms > self.base_interval_ms {
            return Err(ConfigError::FloorAboveBase {
                min_ms: self.min_interval_ms,
                base_ms: self.base_interval_ms,
            });
        }
        if self.initial_segments.is_empty() {
            return Err(ConfigError::EmptySnake);
        }
        if self.snake_palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }

        let mut seen = std::collections::HashSet::new();
        for &cell in self.initial_segments.iter().chain([&self.initial_food]) {
            if !grid.contains(cell) || grid.is_border(cell) {
                return Err(ConfigError::StartOnBorder {
                    col: cell.col,
                    row: cell.row,
                });
            }
            if !seen.insert(cell) {
                return Err(ConfigError::StartOverlap {
                    col: cell.col,
                    row: cell.row,
                });
            }
        }

        for pair in self.initial_segments.windows(2) {
            let (front, back) = (pair[0], pair[1]);
            if (front.col - back.col).abs() + (front.row - back.row).abs() != 1 {
                return Err(ConfigError::StartNotContiguous {
                    col: back.col,
                    row: back.row,
                });
            }
        }
        Ok(())
    }
}
