use std::io;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;
use unicode_width::UnicodeWidthStr;

use crate::config::{GridSize, Theme};
use crate::game_loop::Renderer;
use crate::grid::CellState;
use crate::input::Direction;
use crate::simulation::Simulation;
use crate::snake::Position;
use crate::terminal_runtime::TerminalSession;
use crate::ui::hud::render_hud;

const GLYPH_SNAKE_HEAD_UP: &str = "/\\";
const GLYPH_SNAKE_HEAD_DOWN: &str = "\\/";
const GLYPH_SNAKE_HEAD_LEFT: &str = "<:";
const GLYPH_SNAKE_HEAD_RIGHT: &str = ":>";
const GLYPH_SNAKE_BODY: &str = "██";
const GLYPH_SNAKE_TAIL: &str = "▓▓";
const GLYPH_COLLECTIBLE: &str = "()";

/// Symbol and style drawn for one cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct CellGlyph {
    pub symbol: &'static str,
    pub style: Style,
}

/// Cell-state-plus-orientation to glyph mapping, resolved once per theme.
#[derive(Debug, Clone)]
pub struct CellPalette {
    heads: [CellGlyph; 4],
    body: CellGlyph,
    tail: CellGlyph,
    collectible: CellGlyph,
    cell_width: u16,
}

impl CellPalette {
    #[must_use]
    pub fn from_theme(theme: &Theme) -> Self {
        let head_style = Style::new()
            .fg(theme.snake_head)
            .bg(theme.play_bg)
            .add_modifier(Modifier::BOLD);
        let head = |symbol: &'static str| CellGlyph {
            symbol,
            style: head_style,
        };

        let heads = [
            head(GLYPH_SNAKE_HEAD_UP),
            head(GLYPH_SNAKE_HEAD_DOWN),
            head(GLYPH_SNAKE_HEAD_LEFT),
            head(GLYPH_SNAKE_HEAD_RIGHT),
        ];
        let body = CellGlyph {
            symbol: GLYPH_SNAKE_BODY,
            style: Style::new().fg(theme.snake_body).bg(theme.play_bg),
        };
        let tail = CellGlyph {
            symbol: GLYPH_SNAKE_TAIL,
            style: Style::new().fg(theme.snake_tail).bg(theme.play_bg),
        };
        let collectible = CellGlyph {
            symbol: GLYPH_COLLECTIBLE,
            style: Style::new().fg(theme.collectible).bg(theme.play_bg),
        };

        let cell_width = heads
            .iter()
            .chain([&body, &tail, &collectible])
            .map(|glyph| glyph.symbol.width())
            .max()
            .unwrap_or(1)
            .max(1);

        Self {
            heads,
            body,
            tail,
            collectible,
            cell_width: u16::try_from(cell_width).unwrap_or(u16::MAX),
        }
    }

    /// Returns the glyph for `state`; `heading` orients the head.
    #[must_use]
    pub fn glyph(&self, state: CellState, heading: Direction) -> Option<&CellGlyph> {
        match state {
            CellState::Empty => None,
            CellState::SnakeHead => Some(&self.heads[head_slot(heading)]),
            CellState::SnakeBody => Some(&self.body),
            CellState::SnakeTail => Some(&self.tail),
            CellState::Collectible => Some(&self.collectible),
        }
    }

    /// Terminal columns occupied by one grid cell.
    #[must_use]
    pub fn cell_width(&self) -> u16 {
        self.cell_width
    }
}

fn head_slot(direction: Direction) -> usize {
    match direction {
        Direction::Up => 0,
        Direction::Down => 1,
        Direction::Left => 2,
        Direction::Right => 3,
    }
}

/// Renders the full game frame from immutable state.
pub fn render(frame: &mut Frame<'_>, simulation: &Simulation, palette: &CellPalette, theme: &Theme) {
    let area = frame.area();
    let play_area = render_hud(frame, area, simulation, theme);

    let block = Block::bordered()
        .border_style(Style::new().fg(theme.border_fg))
        .style(Style::new().bg(theme.play_bg));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    let heading = simulation.snake().heading();
    let bounds = simulation.size();
    let buffer = frame.buffer_mut();
    for (position, state) in simulation.grid().cells() {
        let Some(glyph) = palette.glyph(state, heading) else {
            continue;
        };
        let Some((x, y)) = logical_to_terminal(inner, bounds, palette.cell_width(), position)
        else {
            continue;
        };

        buffer.set_string(x, y, glyph.symbol, glyph.style);
    }
}

fn logical_to_terminal(
    inner: Rect,
    bounds: GridSize,
    cell_width: u16,
    position: Position,
) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(cell_width)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(cell_width) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

/// Draws each frame into an owned terminal session.
pub struct TerminalRenderer {
    session: TerminalSession,
    palette: CellPalette,
    theme: &'static Theme,
}

impl TerminalRenderer {
    /// Opens a terminal session big enough for `grid` drawn with `theme`.
    pub fn enter(grid: GridSize, theme: &'static Theme) -> io::Result<Self> {
        let palette = CellPalette::from_theme(theme);
        let session = TerminalSession::enter(grid, palette.cell_width())?;

        Ok(Self {
            session,
            palette,
            theme,
        })
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, simulation: &Simulation) -> io::Result<()> {
        let palette = &self.palette;
        let theme = self.theme;
        self.session
            .draw(|frame| render(frame, simulation, palette, theme))
    }
}
