//! Drawing surface abstraction and its terminal implementation

pub mod terminal;

pub use terminal::TerminalRenderer;

use std::io;

use crate::game::Cell;

/// Receives one composed frame per tick.
///
/// The controller calls `clear`, `draw_score`, `draw_snake`, `draw_food` and
/// `draw_border` in that order, then `present`. On the tick that ends the game
/// it calls only `draw_game_over` followed by `present`.
pub trait Renderer {
    fn clear(&mut self);
    fn draw_border(&mut self);
    fn draw_score(&mut self, score: u32);
    /// Segments are head first; colors cycle through `palette` from the head
    fn draw_snake(&mut self, segments: &[Cell], palette: &[String]);
    fn draw_food(&mut self, position: Cell);
    fn draw_game_over(&mut self);
    /// Flush the composed frame to the surface
    fn present(&mut self) -> io::Result<()>;
}
