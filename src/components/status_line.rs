use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::comparison_state::OverallStatus;
use crate::state::AppState;

use super::Component;

/// Overall match status of the last rendered comparison.
pub struct StatusLine;

impl Component for StatusLine {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let status = &state.view.comparison.status;
        let color = match status {
            OverallStatus::Pending => Color::DarkGray,
            OverallStatus::FullMatch => Color::Green,
            OverallStatus::SomeMismatch => Color::Yellow,
            OverallStatus::Failed(_) => Color::Red,
        };
        let line = Line::from(vec![
            Span::styled(" status: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                status.text(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}
