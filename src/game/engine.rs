use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use super::{
    config::{ConfigError, GameConfig, INITIAL_SEGMENTS},
    food::Food,
    session::{GameSession, SessionStatus},
    snake::{Collision, Snake},
};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate the apple this step
    pub ate_food: bool,
    /// Whether the tick interval got shorter this step
    pub interval_changed: bool,
    /// What ended the session, if anything did
    pub collision: Option<Collision>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the session is over after this step
    pub terminated: bool,
    pub info: StepInfo,
}

impl StepResult {
    fn halted() -> Self {
        Self {
            terminated: true,
            info: StepInfo {
                ate_food: false,
                interval_changed: false,
                collision: None,
            },
        }
    }
}

/// Applies the movement, collision, growth and speed rules to a session
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::from_entropy(),
        })
    }

    /// Engine with reproducible apple placement
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Create a fresh session from the starting layout
    pub fn new_session(&self) -> GameSession {
        // validate() rejects an empty layout
        let fallback = INITIAL_SEGMENTS;
        let (head, body) = self
            .config
            .initial_segments
            .split_first()
            .unwrap_or((&fallback[0], &fallback[1..]));
        let snake = Snake::new(*head, body.iter().copied(), self.config.initial_direction);

        GameSession::new(
            self.config.grid(),
            snake,
            Food::at(self.config.initial_food),
            self.config.base_interval(),
        )
    }

    /// Advance the session by one tick
    pub fn step(&mut self, session: &mut GameSession) -> StepResult {
        if session.is_over() {
            return StepResult::halted();
        }

        let new_head = session.snake.commit_and_peek();

        if let Some(collision) = session.snake.collision(new_head, &session.grid) {
            session.status = SessionStatus::Over;
            info!(
                ?collision,
                col = new_head.col,
                row = new_head.row,
                score = session.score,
                "Snake crashed, game over"
            );
            return StepResult {
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    interval_changed: false,
                    collision: Some(collision),
                },
            };
        }

        session.snake.push_head(new_head);

        let ate_food = session.food.is_at(new_head);
        let mut interval_changed = false;

        if ate_food {
            session.score += 1;
            session.food.relocate(&session.grid, &mut self.rng);

            let next = self.config.next_interval(session.interval);
            interval_changed = next != session.interval;
            session.interval = next;

            debug!(
                score = session.score,
                food_col = session.food.position().col,
                food_row = session.food.position().row,
                interval_ms = session.interval.as_millis() as u64,
                "Apple eaten"
            );
        } else {
            session.snake.drop_tail();
        }

        StepResult {
            terminated: false,
            info: StepInfo {
                ate_food,
                interval_changed,
                collision: None,
            },
        }
    }
}
