use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::config::Theme;
use crate::simulation::{Simulation, SimulationStatus};

/// Rows reserved below the play area for the status bar.
pub const HUD_ROWS: u16 = 1;

const HUD_MARGIN_X: u16 = 1;
const CONTROLS_HINT: &str = "[arrows/WASD] move  [q] quit";

/// Renders the one-line status bar and returns the play area above it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, simulation: &Simulation, theme: &Theme) -> Rect {
    let [play_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(HUD_ROWS)]).areas(area);
    let status_area = inset_horizontal(status_area, HUD_MARGIN_X);

    let style = Style::new().fg(theme.hud_fg);
    frame.render_widget(
        Paragraph::new(status_line(simulation, theme)).style(style),
        status_area,
    );
    frame.render_widget(
        Paragraph::new(CONTROLS_HINT)
            .alignment(Alignment::Right)
            .style(style),
        status_area,
    );

    play_area
}

/// Builds the left-hand status text.
#[must_use]
pub fn status_line<'a>(simulation: &Simulation, theme: &Theme) -> Line<'a> {
    let mut spans = vec![Span::raw(format!(
        "length {}  ticks {}  collected {}",
        simulation.snake().len(),
        simulation.tick_count(),
        simulation.collected()
    ))];

    if simulation.status() == SimulationStatus::Collided {
        spans.push(Span::styled(
            "  collided",
            Style::new()
                .fg(theme.collectible)
                .add_modifier(Modifier::BOLD),
        ));
    }

    Line::from(spans)
}

fn inset_horizontal(area: Rect, margin: u16) -> Rect {
    let width = area.width.saturating_sub(margin.saturating_mul(2));
    Rect {
        x: area.x.saturating_add(margin),
        width,
        ..area
    }
}
