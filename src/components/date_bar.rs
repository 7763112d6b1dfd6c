use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::selection::{DateField, DateSelection};
use crate::state::comparison_state::CommitLink;
use crate::state::AppState;

use super::text_input::input_spans;
use super::Component;

/// The `from` and `to` fields side by side, each with its commit link.
pub struct DateBar;

impl Component for DateBar {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        render_field(frame, halves[0], state, DateField::From);
        render_field(frame, halves[1], state, DateField::To);
    }
}

fn render_field(frame: &mut Frame, area: Rect, state: &AppState, field: DateField) {
    let input = state.view.field(field);
    let focused = state.focus == field;
    let commit = match field {
        DateField::From => &state.view.comparison.from_commit,
        DateField::To => &state.view.comparison.to_commit,
    };

    let border_color = if input.is_invalid() {
        Color::Red
    } else if focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let title = match input.selection {
        DateSelection::Today => format!(" {} (today) ", field.label()),
        DateSelection::Explicit(_) => format!(" {} ", field.label()),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let value_style = Style::default().fg(Color::White);
    let mut value_line = vec![Span::raw(" ")];
    if input.editing {
        value_line.extend(input_spans(
            &input.buffer.text(),
            input.buffer.cursor(),
            (inner.width as usize).saturating_sub(2),
            value_style,
        ));
    } else {
        value_line.push(Span::styled(
            input.value.clone(),
            value_style.add_modifier(Modifier::BOLD),
        ));
        if let Some(ref rejected) = input.invalid {
            value_line.push(Span::styled(
                format!("  invalid: {rejected}"),
                Style::default().fg(Color::Red),
            ));
        }
    }

    let lines = vec![Line::from(value_line), commit_line(commit)];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn commit_line(commit: &CommitLink) -> Line<'static> {
    if commit.label.is_empty() {
        return Line::from(Span::styled(
            " commit: -",
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(vec![
        Span::styled(" commit: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{:.7} ", commit.label),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            commit.href.clone(),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        ),
    ])
}
