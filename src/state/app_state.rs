use crate::selection::DateField;
use crate::view::ComparisonView;

pub struct AppState {
    pub view: ComparisonView,
    /// Date field that editing and "today" apply to.
    pub focus: DateField,
    pub should_quit: bool,
    pub status_message: Option<(String, bool)>, // (message, is_error)
    /// Rows that fit in the table viewport, for page scrolling.
    pub table_height: usize,
}

impl AppState {
    pub fn new(view: ComparisonView) -> Self {
        Self {
            view,
            focus: DateField::From,
            should_quit: false,
            status_message: None,
            table_height: 10,
        }
    }

    pub fn editing(&self) -> bool {
        self.view.field(self.focus).editing
    }
}
