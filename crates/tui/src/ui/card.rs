use api_types::expense::TotalSpent;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::{query::QueryState, ui::theme::Theme};

pub const CARD_WIDTH: u16 = 44;
const CARD_HEIGHT: u16 = 6;

const TITLE: &str = "Total Spent:";
const DESCRIPTION: &str = "The total amount you've spent.";
const PENDING: &str = "...";

/// Horizontally centred rect of at most `width` x `height` inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Card for the total-spent query. Only the error line is drawn on failure.
pub struct TotalSpentCard<'a> {
    state: &'a QueryState<TotalSpent>,
    theme: &'a Theme,
}

impl<'a> TotalSpentCard<'a> {
    pub fn new(state: &'a QueryState<TotalSpent>, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let value = match self.state {
            QueryState::Error(message) => {
                self.render_error(frame, area, message);
                return;
            }
            QueryState::Pending => PENDING.to_string(),
            QueryState::Success(data) => data.total.to_string(),
        };

        let area = centered(area, CARD_WIDTH, CARD_HEIGHT);
        let block = Block::default()
            .title(Span::styled(
                format!(" {TITLE} "),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.surface));

        let lines = vec![
            Line::from(Span::styled(DESCRIPTION, Style::default().fg(self.theme.dim))),
            Line::default(),
            Line::from(Span::styled(
                value,
                Style::default()
                    .fg(self.theme.text)
                    .add_modifier(Modifier::BOLD),
            )),
        ];

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_error(&self, frame: &mut Frame<'_>, area: Rect, message: &str) {
        let text = format!("An error has occurred: {message}");
        let width = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(self.theme.error)),
            centered(area, width, 1),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::Amount;
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    fn draw(state: &QueryState<TotalSpent>) -> String {
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        terminal
            .draw(|frame| TotalSpentCard::new(state, &theme).render(frame, frame.area()))
            .unwrap();
        text(terminal.backend().buffer())
    }

    fn text(buffer: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn success_renders_total_verbatim() {
        let screen = draw(&QueryState::Success(TotalSpent {
            total: Amount::from("42.50".to_string()),
        }));
        assert!(screen.contains("Total Spent:"));
        assert!(screen.contains("The total amount you've spent."));
        assert!(screen.contains("42.50"));
    }

    #[test]
    fn pending_renders_placeholder() {
        let screen = draw(&QueryState::Pending);
        assert!(screen.contains("Total Spent:"));
        assert!(screen.contains("..."));
    }

    #[test]
    fn error_renders_only_the_message() {
        let screen = draw(&QueryState::Error(
            "Failed to fetch total spent".to_string(),
        ));
        assert!(screen.contains("An error has occurred: Failed to fetch total spent"));
        assert!(!screen.contains("Total Spent:"));
    }

    #[test]
    fn card_is_bounded_and_centred() {
        let area = centered(Rect::new(0, 0, 80, 10), CARD_WIDTH, CARD_HEIGHT);
        assert_eq!(area.width, 44);
        assert_eq!(area.x, 18);

        let narrow = centered(Rect::new(0, 0, 30, 4), CARD_WIDTH, CARD_HEIGHT);
        assert_eq!(narrow, Rect::new(0, 0, 30, 4));
    }
}
