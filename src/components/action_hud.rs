use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::AppState;

use super::Component;

pub struct ActionHud;

impl Component for ActionHud {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        // Show a transient notice if present, otherwise show keybindings
        if let Some((ref msg, is_error)) = state.status_message {
            let color = if is_error { Color::Red } else { Color::Green };
            let bar = Paragraph::new(Line::from(vec![
                Span::raw(" "),
                Span::styled(msg.as_str(), Style::default().fg(color)),
            ]))
            .style(Style::default().bg(Color::Rgb(30, 30, 30)));
            frame.render_widget(bar, area);
            return;
        }

        let bindings: &[(&str, &str)] = if state.editing() {
            &[
                ("Enter", "apply"),
                ("Esc", "cancel"),
                ("^W", "delete part"),
                ("\u{2190}/\u{2192}", "move"),
            ]
        } else {
            &[
                ("q", "quit"),
                ("Tab", "field"),
                ("e", "edit"),
                ("t", "today"),
                ("r", "refresh"),
                ("y", "copy link"),
                ("j/k", "scroll"),
                ("g/G", "top/bottom"),
            ]
        };

        let mut spans = vec![Span::raw(" ")];
        for (i, (key, desc)) in bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                format!("[{key}]"),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                (*desc).to_string(),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let bar =
            Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Rgb(30, 30, 30)));
        frame.render_widget(bar, area);
    }
}
