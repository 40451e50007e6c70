//! Game loop controller
//!
//! Drives one [`GameEngine::step`] per scheduled tick, renders the result and
//! keeps the scheduler's cadence in line with the session's tick interval.
//! All entry points take `&mut self`, so a tick can never start while another
//! one is still updating or rendering.

pub mod scheduler;

pub use scheduler::{Scheduler, SchedulerError, TickHandle, TokioScheduler};

use std::{io, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

use crate::game::{Direction, GameEngine, GameSession};
use crate::render::Renderer;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("failed to arm tick cadence")]
    Scheduler(#[from] SchedulerError),
    #[error("failed to present frame")]
    Render(#[from] io::Error),
}

/// What a tick amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// The snake moved and the frame was drawn
    Continue,
    /// This tick ended the game; no further ticks are scheduled
    GameOver,
    /// The game had already ended, nothing happened
    Halted,
}

pub struct GameController<R: Renderer, S: Scheduler> {
    engine: GameEngine,
    session: GameSession,
    renderer: R,
    scheduler: S,
    handle: Option<TickHandle>,
}

impl<R: Renderer, S: Scheduler> GameController<R, S> {
    pub fn new(engine: GameEngine, renderer: R, scheduler: S) -> Self {
        let session = engine.new_session();
        Self {
            engine,
            session,
            renderer,
            scheduler,
            handle: None,
        }
    }

    /// Arm the tick cadence and draw the opening frame
    pub fn start(&mut self) -> Result<(), ControllerError> {
        self.arm()?;
        info!(
            width = self.session.grid.width(),
            height = self.session.grid.height(),
            interval_ms = self.session.interval.as_millis() as u64,
            "Game started"
        );
        self.render_frame()
    }

    /// Run one tick: update the session, then render or report game over
    pub fn on_tick(&mut self) -> Result<TickStatus, ControllerError> {
        if !self.session.is_running() {
            return Ok(TickStatus::Halted);
        }

        let result = self.engine.step(&mut self.session);

        if result.terminated {
            self.halt();
            self.renderer.draw_game_over();
            self.renderer.present()?;
            return Ok(TickStatus::GameOver);
        }

        if result.info.interval_changed {
            self.rearm()?;
        }

        self.render_frame()?;
        Ok(TickStatus::Continue)
    }

    /// Queue a heading for the next tick
    pub fn handle_direction_request(&mut self, direction: Direction) {
        if self.session.is_running() {
            self.session.snake.set_direction(direction);
        }
    }

    /// Begin a new session after game over. Returns false while a game is still running.
    pub fn restart(&mut self) -> Result<bool, ControllerError> {
        if self.session.is_running() {
            return Ok(false);
        }
        info!(previous_score = self.session.score, "Restarting");
        self.halt();
        self.session = self.engine.new_session();
        self.start()?;
        Ok(true)
    }

    /// Present the current frame again, e.g. after the surface was resized
    pub fn redraw(&mut self) -> Result<(), ControllerError> {
        self.renderer.present()?;
        Ok(())
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    pub fn is_over(&self) -> bool {
        self.session.is_over()
    }

    pub fn interval(&self) -> Duration {
        self.session.interval
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn armed_handle(&self) -> Option<TickHandle> {
        self.handle
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn render_frame(&mut self) -> Result<(), ControllerError> {
        let segments = self.session.segments();

        self.renderer.clear();
        self.renderer.draw_score(self.session.score);
        self.renderer
            .draw_snake(&segments, &self.engine.config().snake_palette);
        self.renderer.draw_food(self.session.food.position());
        self.renderer.draw_border();
        self.renderer.present()?;
        Ok(())
    }

    fn arm(&mut self) -> Result<(), ControllerError> {
        let handle = self.scheduler.schedule_repeating(self.session.interval)?;
        self.handle = Some(handle);
        Ok(())
    }

    /// Swap the live cadence for one at the session's current interval
    fn rearm(&mut self) -> Result<(), ControllerError> {
        if let Some(previous) = self.handle.take() {
            self.scheduler.cancel(previous);
        } else {
            warn!("Speed changed with no cadence armed");
        }
        self.arm()?;
        info!(
            interval_ms = self.session.interval.as_millis() as u64,
            score = self.session.score,
            "Speed up"
        );
        Ok(())
    }

    fn halt(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.scheduler.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, Food, GameConfig, Snake};

    #[derive(Debug, Clone, PartialEq)]
    enum Draw {
        Clear,
        Border,
        Score(u32),
        Snake(Vec<Cell>),
        Food(Cell),
        GameOver,
        Present,
    }

    #[derive(Default)]
    struct RecordingRenderer {
        calls: Vec<Draw>,
    }

    impl RecordingRenderer {
        fn take(&mut self) -> Vec<Draw> {
            std::mem::take(&mut self.calls)
        }
    }

    impl Renderer for RecordingRenderer {
        fn clear(&mut self) {
            self.calls.push(Draw::Clear);
        }
        fn draw_border(&mut self) {
            self.calls.push(Draw::Border);
        }
        fn draw_score(&mut self, score: u32) {
            self.calls.push(Draw::Score(score));
        }
        fn draw_snake(&mut self, segments: &[Cell], palette: &[String]) {
            assert!(!palette.is_empty());
            self.calls.push(Draw::Snake(segments.to_vec()));
        }
        fn draw_food(&mut self, position: Cell) {
            self.calls.push(Draw::Food(position));
        }
        fn draw_game_over(&mut self) {
            self.calls.push(Draw::GameOver);
        }
        fn present(&mut self) -> io::Result<()> {
            self.calls.push(Draw::Present);
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Timer {
        Armed(TickHandle, Duration),
        Cancelled(TickHandle),
    }

    #[derive(Default)]
    struct ManualScheduler {
        next_id: u64,
        live: Option<TickHandle>,
        log: Vec<Timer>,
        fail: bool,
    }

    impl Scheduler for ManualScheduler {
        fn schedule_repeating(
            &mut self,
            interval: Duration,
        ) -> Result<TickHandle, SchedulerError> {
            if self.fail {
                return Err(SchedulerError::ZeroInterval);
            }
            if let Some(live) = self.live {
                return Err(SchedulerError::AlreadyArmed(live));
            }
            self.next_id += 1;
            let handle = TickHandle(self.next_id);
            self.live = Some(handle);
            self.log.push(Timer::Armed(handle, interval));
            Ok(handle)
        }

        fn cancel(&mut self, handle: TickHandle) {
            if self.live == Some(handle) {
                self.live = None;
            }
            self.log.push(Timer::Cancelled(handle));
        }
    }

    type TestController = GameController<RecordingRenderer, ManualScheduler>;

    fn controller_with(config: GameConfig) -> TestController {
        let engine = GameEngine::with_seed(config, 11).unwrap();
        let mut controller =
            GameController::new(engine, RecordingRenderer::default(), ManualScheduler::default());
        controller.start().unwrap();
        controller.renderer.take();
        controller.scheduler.log.clear();
        controller
    }

    fn controller() -> TestController {
        controller_with(GameConfig::default())
    }

    fn food_ahead(controller: &mut TestController) -> Cell {
        let ahead = controller
            .session
            .snake
            .head()
            .step(controller.session.snake.direction());
        controller.session.food = Food::at(ahead);
        ahead
    }

    #[test]
    fn test_start_arms_once_and_draws() {
        let engine = GameEngine::with_seed(GameConfig::default(), 1).unwrap();
        let mut controller =
            GameController::new(engine, RecordingRenderer::default(), ManualScheduler::default());
        controller.start().unwrap();

        assert_eq!(
            controller.scheduler.log,
            vec![Timer::Armed(TickHandle(1), Duration::from_millis(100))]
        );
        assert_eq!(controller.renderer.calls.first(), Some(&Draw::Clear));
        assert_eq!(controller.renderer.calls.last(), Some(&Draw::Present));
        assert!(controller.is_running());
    }

    #[test]
    fn test_tick_renders_in_fixed_order() {
        let mut controller = controller();

        let status = controller.on_tick().unwrap();

        assert_eq!(status, TickStatus::Continue);
        assert_eq!(
            controller.renderer.take(),
            vec![
                Draw::Clear,
                Draw::Score(0),
                Draw::Snake(vec![Cell::new(8, 5), Cell::new(7, 5), Cell::new(6, 5)]),
                Draw::Food(Cell::new(10, 10)),
                Draw::Border,
                Draw::Present,
            ]
        );
        assert!(controller.scheduler.log.is_empty());
    }

    #[test]
    fn test_direction_request_applies_next_tick() {
        let mut controller = controller();

        controller.handle_direction_request(Direction::Down);
        assert_eq!(controller.session.snake.direction(), Direction::Right);
        assert_eq!(controller.session.snake.head(), Cell::new(7, 5));

        controller.on_tick().unwrap();
        assert_eq!(controller.session.snake.head(), Cell::new(7, 6));
    }

    #[test]
    fn test_reversal_request_ignored() {
        let mut controller = controller();
        controller.handle_direction_request(Direction::Left);
        controller.on_tick().unwrap();
        assert_eq!(controller.session.snake.head(), Cell::new(8, 5));
    }

    #[test]
    fn test_wall_ends_game_once() {
        let mut controller = controller();
        controller.session.snake = Snake::from_segments(
            [Cell::new(1, 5), Cell::new(2, 5), Cell::new(3, 5)],
            Direction::Left,
        )
        .unwrap();
        let before = controller.session.segments();

        assert_eq!(controller.on_tick().unwrap(), TickStatus::GameOver);
        assert!(controller.is_over());
        assert_eq!(controller.session.segments(), before);
        assert_eq!(
            controller.renderer.take(),
            vec![Draw::GameOver, Draw::Present]
        );
        assert_eq!(
            controller.scheduler.log,
            vec![Timer::Cancelled(TickHandle(1))]
        );
        assert_eq!(controller.armed_handle(), None);

        // A stray tick after the end changes nothing and draws nothing
        assert_eq!(controller.on_tick().unwrap(), TickStatus::Halted);
        assert!(controller.renderer.calls.is_empty());
        assert_eq!(controller.scheduler.log.len(), 1);
        assert_eq!(controller.scheduler.live, None);
    }

    #[test]
    fn test_eating_with_reference_config_keeps_cadence() {
        let mut controller = controller();
        let ahead = food_ahead(&mut controller);

        controller.on_tick().unwrap();

        assert_eq!(controller.score(), 1);
        assert_eq!(controller.session.snake.len(), 4);
        assert_ne!(controller.session.food.position(), ahead);
        assert!(!controller.session.grid.is_border(controller.session.food.position()));
        assert_eq!(controller.interval(), Duration::from_millis(100));
        assert!(controller.scheduler.log.is_empty());
        assert!(controller.renderer.take().contains(&Draw::Score(1)));
    }

    #[test]
    fn test_speed_up_cancels_before_rearming() {
        let mut controller = controller_with(GameConfig {
            base_interval_ms: 300,
            interval_step_ms: 100,
            min_interval_ms: 200,
            ..Default::default()
        });

        food_ahead(&mut controller);
        controller.on_tick().unwrap();
        food_ahead(&mut controller);
        controller.on_tick().unwrap();

        assert_eq!(
            controller.scheduler.log,
            vec![
                Timer::Cancelled(TickHandle(1)),
                Timer::Armed(TickHandle(2), Duration::from_millis(200)),
            ]
        );
        assert_eq!(controller.armed_handle(), Some(TickHandle(2)));
        assert_eq!(controller.score(), 2);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut controller = controller();
        assert!(!controller.restart().unwrap());

        controller.session.snake =
            Snake::from_segments([Cell::new(5, 1)], Direction::Up).unwrap();
        controller.session.score = 4;
        controller.on_tick().unwrap();
        assert!(controller.is_over());

        assert!(controller.restart().unwrap());
        assert!(controller.is_running());
        assert_eq!(controller.score(), 0);
        assert_eq!(controller.session.snake.len(), 3);
        assert_eq!(controller.armed_handle(), Some(TickHandle(2)));
    }

    #[test]
    fn test_direction_ignored_after_game_over() {
        let mut controller = controller();
        controller.session.snake =
            Snake::from_segments([Cell::new(5, 1)], Direction::Up).unwrap();
        controller.on_tick().unwrap();

        controller.handle_direction_request(Direction::Left);
        assert_eq!(controller.session.snake.next_direction(), Direction::Up);
    }

    #[test]
    fn test_scheduler_failure_propagates() {
        let engine = GameEngine::with_seed(GameConfig::default(), 1).unwrap();
        let scheduler = ManualScheduler {
            fail: true,
            ..Default::default()
        };
        let mut controller = GameController::new(engine, RecordingRenderer::default(), scheduler);

        assert!(matches!(
            controller.start(),
            Err(ControllerError::Scheduler(_))
        ));
    }
}
