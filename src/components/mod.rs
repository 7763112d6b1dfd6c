pub mod action_hud;
pub mod context_bar;
pub mod date_bar;
pub mod resource_table;
pub mod status_line;
pub mod text_input;

use ratatui::{layout::Rect, Frame};

use crate::state::AppState;

/// Trait for renderable TUI components.
pub trait Component {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState);
}
