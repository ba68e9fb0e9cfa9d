mod card;
mod terminal;
mod theme;

use api_types::expense::TotalSpent;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::query::QueryState;

pub use card::{CARD_WIDTH, TotalSpentCard};
pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &QueryState<TotalSpent>, theme: &Theme) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    TotalSpentCard::new(state, theme).render(frame, layout[0]);

    let hints = Line::from(vec![
        Span::styled("q", Style::default().fg(theme.accent)),
        Span::styled(" quit", Style::default().fg(theme.dim)),
    ]);
    frame.render_widget(Paragraph::new(hints), layout[1]);
}
