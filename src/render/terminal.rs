use std::{collections::HashMap, io};

use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::Renderer;
use crate::game::{Cell, GameConfig, Grid};

const SNAKE_GLYPH: &str = "■ ";
const FOOD_GLYPH: &str = "● ";
const BORDER_GLYPH: &str = "██";
const EMPTY_GLYPH: &str = ". ";

/// Map a configured color name onto a terminal color.
///
/// Names are matched case-insensitively; anything unrecognised becomes `fallback`.
pub fn color_from_name(name: &str, fallback: Color) -> Color {
    let normalized: String = name
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .to_ascii_lowercase();

    match normalized.as_str() {
        "grey" | "gray" => Color::Gray,
        "darkgrey" | "darkgray" => Color::DarkGray,
        "limegreen" | "lime" => Color::LightGreen,
        other => other.parse().unwrap_or(fallback),
    }
}

/// What the current frame is made of, collected between `clear` and `present`
#[derive(Debug, Clone, Default)]
struct Scene {
    score: Option<u32>,
    snake: Vec<(Cell, Color)>,
    food: Option<Cell>,
    border: bool,
    game_over: bool,
}

/// Renders the game as a grid of two-character cells on a ratatui terminal
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
    grid: Grid,
    food_color: Color,
    border_color: Color,
    scene: Scene,
}

impl<B: Backend> TerminalRenderer<B> {
    pub fn new(terminal: Terminal<B>, config: &GameConfig) -> Self {
        Self {
            terminal,
            grid: config.grid(),
            food_color: color_from_name(&config.food_color, Color::LightGreen),
            border_color: color_from_name(&config.border_color, Color::Gray),
            scene: Scene::default(),
        }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }
}

impl<B: Backend> Renderer for TerminalRenderer<B> {
    fn clear(&mut self) {
        self.scene = Scene::default();
    }

    fn draw_border(&mut self) {
        self.scene.border = true;
    }

    fn draw_score(&mut self, score: u32) {
        self.scene.score = Some(score);
    }

    fn draw_snake(&mut self, segments: &[Cell], palette: &[String]) {
        self.scene.snake = segments
            .iter()
            .enumerate()
            .map(|(i, &cell)| {
                let color = if palette.is_empty() {
                    Color::Green
                } else {
                    color_from_name(&palette[i % palette.len()], Color::Green)
                };
                (cell, color)
            })
            .collect();
    }

    fn draw_food(&mut self, position: Cell) {
        self.scene.food = Some(position);
    }

    fn draw_game_over(&mut self) {
        // Drawn over whatever the last frame showed
        self.scene.game_over = true;
    }

    fn present(&mut self) -> io::Result<()> {
        let scene = &self.scene;
        let view = GridView {
            grid: self.grid,
            food_color: self.food_color,
            border_color: self.border_color,
        };
        self.terminal.draw(|frame| view.render(frame, scene))?;
        Ok(())
    }
}

struct GridView {
    grid: Grid,
    food_color: Color,
    border_color: Color,
}

impl GridView {
    fn render(&self, frame: &mut Frame, scene: &Scene) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Score
                Constraint::Min(0),    // Grid
                Constraint::Length(1), // Controls
            ])
            .split(frame.area());

        frame.render_widget(self.render_score(scene), chunks[0]);

        let grid_area = centered(
            chunks[1],
            cells_to_columns(self.grid.width()).saturating_mul(2),
            cells_to_columns(self.grid.height()),
        );
        frame.render_widget(self.render_grid(scene), grid_area);

        frame.render_widget(render_controls(), chunks[2]);

        if scene.game_over {
            let banner_area = centered(chunks[1], 30, 7);
            frame.render_widget(Clear, banner_area);
            frame.render_widget(render_game_over(scene.score.unwrap_or(0)), banner_area);
        }
    }

    fn render_score(&self, scene: &Scene) -> Paragraph<'static> {
        let mut spans = Vec::new();
        if let Some(score) = scene.score {
            spans.push(Span::styled("Score: ", Style::default().fg(Color::Yellow)));
            spans.push(Span::styled(
                score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        Paragraph::new(Line::from(spans)).alignment(Alignment::Left)
    }

    fn render_grid(&self, scene: &Scene) -> Paragraph<'static> {
        let snake: HashMap<Cell, Color> = scene.snake.iter().rev().copied().collect();
        let head = scene.snake.first().map(|(cell, _)| *cell);

        let mut lines = Vec::with_capacity(self.grid.height() as usize);
        for row in 0..self.grid.height() {
            let mut spans = Vec::with_capacity(self.grid.width() as usize);
            for col in 0..self.grid.width() {
                let cell = Cell::new(col, row);

                let span = if scene.border && self.grid.is_border(cell) {
                    Span::styled(BORDER_GLYPH, Style::default().fg(self.border_color))
                } else if let Some(&color) = snake.get(&cell) {
                    let mut style = Style::default().fg(color);
                    if Some(cell) == head {
                        style = style.add_modifier(Modifier::BOLD);
                    }
                    Span::styled(SNAKE_GLYPH, style)
                } else if scene.food == Some(cell) {
                    Span::styled(
                        FOOD_GLYPH,
                        Style::default()
                            .fg(self.food_color)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(EMPTY_GLYPH, Style::default().fg(Color::DarkGray))
                };
                spans.push(span);
            }
            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
    }
}

fn render_game_over(score: u32) -> Paragraph<'static> {
    let text = vec![
        Line::from(vec![Span::styled(
            "Game Over",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::styled(" restart  ", Style::default().fg(Color::Gray)),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::styled(" quit", Style::default().fg(Color::Gray)),
        ]),
    ];

    Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::Red)),
    )
}

fn render_controls() -> Paragraph<'static> {
    Paragraph::new(Line::from(vec![
        Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
        Span::raw(" or "),
        Span::styled("WASD", Style::default().fg(Color::Cyan)),
        Span::raw(" to move | "),
        Span::styled("Q", Style::default().fg(Color::Red)),
        Span::raw(" to quit"),
    ]))
    .alignment(Alignment::Center)
}

/// A cell count as terminal columns or rows, saturating at `u16::MAX`
fn cells_to_columns(cells: i32) -> u16 {
    u16::try_from(cells.max(0)).unwrap_or(u16::MAX)
}

/// A `width` x `height` rectangle centred in `area`, clipped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;

    use super::*;

    fn renderer(config: &GameConfig) -> TerminalRenderer<TestBackend> {
        let terminal = Terminal::new(TestBackend::new(90, 46)).unwrap();
        TerminalRenderer::new(terminal, config)
    }

    fn screen(renderer: &TerminalRenderer<TestBackend>) -> String {
        let buffer = renderer.terminal().backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn compose(renderer: &mut TerminalRenderer<TestBackend>, config: &GameConfig, score: u32) {
        renderer.clear();
        renderer.draw_score(score);
        renderer.draw_snake(&config.initial_segments, &config.snake_palette);
        renderer.draw_food(config.initial_food);
        renderer.draw_border();
    }

    #[test]
    fn test_color_names() {
        assert_eq!(color_from_name("Grey", Color::Reset), Color::Gray);
        assert_eq!(color_from_name("LimeGreen", Color::Reset), Color::LightGreen);
        assert_eq!(color_from_name("lightBlue", Color::Reset), Color::LightBlue);
        assert_eq!(color_from_name("Green", Color::Reset), Color::Green);
        assert_eq!(color_from_name("toughGreen", Color::Green), Color::Green);
    }

    #[test]
    fn test_frame_shows_score_snake_food_and_border() {
        let config = GameConfig::default();
        let mut renderer = renderer(&config);
        compose(&mut renderer, &config, 3);
        renderer.present().unwrap();

        let text = screen(&renderer);
        assert!(text.contains("Score: 3"));
        assert_eq!(text.matches('■').count(), 3);
        assert_eq!(text.matches('●').count(), 1);
        assert!(text.contains(BORDER_GLYPH));
        assert!(!text.contains("Game Over"));
    }

    #[test]
    fn test_clear_drops_previous_frame() {
        let config = GameConfig::default();
        let mut renderer = renderer(&config);
        compose(&mut renderer, &config, 1);
        renderer.clear();
        renderer.present().unwrap();

        let text = screen(&renderer);
        assert!(!text.contains("Score"));
        assert_eq!(text.matches('■').count(), 0);
        assert!(!text.contains(BORDER_GLYPH));
    }

    #[test]
    fn test_game_over_overlays_last_frame() {
        let config = GameConfig::default();
        let mut renderer = renderer(&config);
        compose(&mut renderer, &config, 7);
        renderer.present().unwrap();

        renderer.draw_game_over();
        renderer.present().unwrap();

        let text = screen(&renderer);
        assert!(text.contains("Game Over"));
        assert!(text.contains("Final Score: 7"));
        assert!(text.contains("Score: 7"));
    }

    #[test]
    fn test_cells_to_columns_saturates() {
        assert_eq!(cells_to_columns(40), 40);
        assert_eq!(cells_to_columns(-3), 0);
        assert_eq!(cells_to_columns(1_100_000_000), u16::MAX);
        assert_eq!(cells_to_columns(1_100_000_000).saturating_mul(2), u16::MAX);
    }

    #[test]
    fn test_largest_valid_grid_lays_out() {
        let config = GameConfig {
            surface_width: crate::game::config::MAX_GRID_WIDTH as u32,
            surface_height: 40,
            cell_size: 1,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        let width = cells_to_columns(config.grid().width()).saturating_mul(2);
        let area = centered(Rect::new(0, 0, 90, 44), width, 40);
        assert_eq!(area.width, 90);
    }

    #[test]
    fn test_small_surface_is_clipped() {
        let config = GameConfig::default();
        let terminal = Terminal::new(TestBackend::new(20, 8)).unwrap();
        let mut renderer = TerminalRenderer::new(terminal, &config);
        compose(&mut renderer, &config, 0);
        renderer.draw_game_over();
        renderer.present().unwrap();
    }
}
