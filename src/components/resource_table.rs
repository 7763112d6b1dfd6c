use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::state::{AppState, ResourceRow};

use super::Component;

const HEADERS: [&str; 4] = ["Resource", "Status", "Previous State", "Current State"];

pub struct ResourceTable;

impl Component for ResourceTable {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let comparison = &state.view.comparison;
        let total = comparison.rows.len();

        let mut block = Block::default()
            .title(format!(" Resources ({total}) "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        if total > 0 {
            block = block.title_bottom(
                Line::from(format!(" {}/{} ", comparison.scroll + 1, total)).right_aligned(),
            );
        }

        if total == 0 {
            let msg = if comparison.loading {
                " Comparing..."
            } else {
                " No resources"
            };
            let paragraph = Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let header = Row::new(HEADERS.map(|h| {
            Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))
        }))
        .bottom_margin(1);

        let rows: Vec<Row> = comparison
            .rows
            .iter()
            .skip(comparison.scroll)
            .map(table_row)
            .collect();

        let widths = [
            Constraint::Percentage(20),
            Constraint::Length(15),
            Constraint::Percentage(35),
            Constraint::Percentage(35),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .block(block);
        frame.render_widget(table, area);
    }
}

fn table_row(row: &ResourceRow) -> Row<'static> {
    let status_color = if row.matches {
        Color::Green
    } else {
        Color::Red
    };
    let height = u16::try_from(row.height()).unwrap_or(u16::MAX);
    Row::new(vec![
        Cell::from(row.key.clone()),
        Cell::from(row.status_label()).style(Style::default().fg(status_color)),
        Cell::from(Text::from(row.lhs.clone())),
        Cell::from(Text::from(row.rhs.clone())),
    ])
    .height(height)
    .bottom_margin(1)
}
