use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use tracing::{debug, info};

use crate::controller::{GameController, TickStatus, TokioScheduler};
use crate::game::{GameConfig, GameEngine};
use crate::input::{InputHandler, KeyAction};
use crate::render::TerminalRenderer;

type TerminalController = GameController<TerminalRenderer<CrosstermBackend<Stderr>>, TokioScheduler>;

/// Interactive play in the terminal
pub struct PlayMode {
    config: GameConfig,
    seed: Option<u64>,
    input_handler: InputHandler,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        Self {
            config,
            seed,
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let engine = match self.seed {
            Some(seed) => GameEngine::with_seed(self.config.clone(), seed),
            None => GameEngine::new(self.config.clone()),
        }
        .context("Invalid game configuration")?;

        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let renderer = TerminalRenderer::new(terminal, &self.config);
        let mut controller = GameController::new(engine, renderer, TokioScheduler::new());

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut controller).await;

        cleanup_terminal(controller.renderer_mut().terminal_mut())?;

        if result.is_ok() {
            info!(score = controller.score(), "Session closed");
        }
        result
    }

    async fn run_game_loop(&mut self, controller: &mut TerminalController) -> Result<()> {
        let mut event_stream = EventStream::new();
        controller.start().context("Failed to start game")?;

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(controller, event)?,
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick, never fires once the game is over
                _ = controller.scheduler_mut().tick() => {
                    let status = controller.on_tick().context("Game tick failed")?;
                    if status == TickStatus::GameOver {
                        info!(score = controller.score(), "Game over");
                    }
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, controller: &mut TerminalController, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return Ok(());
                }

                match self.input_handler.handle_key_event(key) {
                    KeyAction::Turn(direction) => {
                        debug!(?direction, "Direction requested");
                        controller.handle_direction_request(direction);
                    }
                    KeyAction::Restart => {
                        controller.restart().context("Failed to restart game")?;
                    }
                    KeyAction::Quit => {
                        self.should_quit = true;
                    }
                    KeyAction::None => {}
                }
            }
            Event::Resize(..) => {
                controller.redraw().context("Failed to redraw after resize")?;
            }
            _ => {}
        }

        Ok(())
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}
