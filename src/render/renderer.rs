use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use std::collections::HashSet;

use crate::game::{GameConfig, Palette, Position, Snapshot};

const FILLED: &str = "█";

/// Draws snapshots as a grid of terminal cells, `cell_width` characters per cell
pub struct Renderer {
    grid_size: usize,
    cell_width: u16,
    hard_walls: bool,
    debug: bool,
    palette: Palette,
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}

impl Renderer {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            grid_size: config.grid_size,
            cell_width: config.cell_width,
            hard_walls: config.hard_walls,
            debug: config.debug,
            palette: config.palette,
        }
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot, ticks: u64) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        let header = self.render_status(ticks);
        frame.render_widget(header, chunks[0]);

        let board_width = self.board_width();
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(board_width),
                Constraint::Min(0),
            ])
            .split(chunks[1])[1];

        if snapshot.game_over {
            let game_over = self.render_game_over(snapshot);
            frame.render_widget(game_over, game_area);
        } else {
            let grid = self.render_grid(snapshot);
            frame.render_widget(grid, game_area);
        }

        let controls = self.render_controls(chunks[2]);
        frame.render_widget(controls, chunks[2]);
    }

    /// Columns taken by the bordered grid, clamped to what a terminal can address
    fn board_width(&self) -> u16 {
        u16::try_from(self.grid_size)
            .unwrap_or(u16::MAX)
            .saturating_mul(self.cell_width)
            .saturating_add(2)
    }

    fn cell(&self, color: Color) -> Span<'static> {
        let background = rgb(self.palette.background);
        Span::styled(
            FILLED.repeat(self.cell_width as usize),
            Style::default().fg(color).bg(background),
        )
    }

    fn empty_cell(&self) -> Span<'static> {
        Span::styled(
            " ".repeat(self.cell_width as usize),
            Style::default().bg(rgb(self.palette.background)),
        )
    }

    fn render_grid(&self, snapshot: &Snapshot) -> Paragraph<'static> {
        let head = snapshot.head();
        let body: HashSet<Position> = snapshot.segments.iter().skip(1).copied().collect();
        let side = self.grid_size as i32;

        let lines: Vec<Line> = (0..side)
            .map(|y| {
                let spans: Vec<Span> = (0..side)
                    .map(|x| {
                        let pos = Position::new(x, y);
                        if head == Some(pos) {
                            self.cell(rgb(self.palette.head))
                        } else if body.contains(&pos) {
                            self.cell(rgb(self.palette.body))
                        } else if snapshot.has_food_at(pos) {
                            self.cell(rgb(self.palette.food))
                        } else {
                            self.empty_cell()
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_status(&self, ticks: u64) -> Paragraph<'static> {
        let walls = if self.hard_walls { "hard" } else { "wrap" };
        let mut spans = vec![
            Span::styled("Walls: ", Style::default().fg(Color::Yellow)),
            Span::styled(walls, Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Tick: ", Style::default().fg(Color::Yellow)),
            Span::styled(ticks.to_string(), Style::default().fg(Color::White)),
        ];
        if self.debug {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "DEBUG",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_game_over(&self, snapshot: &Snapshot) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Length: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.segments.len().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, _area: Rect) -> Paragraph<'static> {
        let mut spans = vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ];
        if self.debug {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled("Space", Style::default().fg(Color::Magenta)));
            spans.push(Span::raw(" drops food"));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}
