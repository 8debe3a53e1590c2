use std::io::{self, Stdout};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};

use crate::config::GridSize;
use crate::error::TerminalError;
use crate::ui::hud::HUD_ROWS;

/// Columns and rows taken by the play-area border.
const BORDER_CELLS: u16 = 2;

/// Terminal columns and rows needed to show `grid` without clipping.
#[must_use]
pub fn required_terminal_size(grid: GridSize, cell_width: u16) -> (u16, u16) {
    let columns = grid
        .width
        .saturating_mul(cell_width)
        .saturating_add(BORDER_CELLS);
    let rows = grid
        .height
        .saturating_add(BORDER_CELLS)
        .saturating_add(HUD_ROWS);
    (columns, rows)
}

/// Fails when a `columns` x `rows` terminal cannot hold `grid`.
pub fn ensure_grid_fits(
    grid: GridSize,
    cell_width: u16,
    (columns, rows): (u16, u16),
) -> Result<(), TerminalError> {
    let (required_columns, required_rows) = required_terminal_size(grid, cell_width);
    if columns >= required_columns && rows >= required_rows {
        return Ok(());
    }

    Err(TerminalError::TooSmall {
        grid_width: grid.width,
        grid_height: grid.height,
        required_columns,
        required_rows,
        columns,
        rows,
    })
}

/// Raw-mode alternate screen sized for one grid, restored on drop.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    /// Checks the terminal can hold `grid` at `cell_width`, then takes over the screen.
    pub fn enter(grid: GridSize, cell_width: u16) -> io::Result<Self> {
        ensure_grid_fits(grid, cell_width, terminal::size()?)?;

        terminal::enable_raw_mode()?;
        let terminal = take_over_screen().inspect_err(|_| {
            let _ = restore_terminal();
        })?;

        log::info!(
            "terminal session entered for a {}x{} grid",
            grid.width,
            grid.height
        );
        Ok(Self { terminal })
    }

    /// Draws one frame.
    pub fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        self.terminal.draw(render).map(|_| ())
    }
}

fn take_over_screen() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(error) = restore_terminal() {
            log::warn!("failed to restore terminal: {error}");
        }
    }
}

/// Leaves raw mode and the alternate screen; also used by the panic hook.
pub fn restore_terminal() -> io::Result<()> {
    let raw_mode = terminal::disable_raw_mode();
    execute!(io::stdout(), Show, LeaveAlternateScreen)?;
    raw_mode
}
