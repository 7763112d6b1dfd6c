use chrono::NaiveDateTime;

use crate::selection::{format_seconds, DateSelection};

use super::TextBuffer;

/// One date field: the last valid selection, the text it displays, and an
/// in-progress edit.
#[derive(Debug, Clone)]
pub struct DateInputState {
    pub selection: DateSelection,
    /// Displayed value; this is what a comparison reads.
    pub value: String,
    /// Last rejected input, shown until the next valid change.
    pub invalid: Option<String>,
    pub editing: bool,
    pub buffer: TextBuffer,
}

impl DateInputState {
    pub fn new(selection: DateSelection, now: NaiveDateTime) -> Self {
        Self {
            selection,
            value: format_seconds(&selection.resolve(now)),
            invalid: None,
            editing: false,
            buffer: TextBuffer::new(),
        }
    }

    /// Accept a valid selection; clears any invalid marker.
    pub fn accept(&mut self, selection: DateSelection, now: NaiveDateTime) {
        self.selection = selection;
        self.value = format_seconds(&selection.resolve(now));
        self.invalid = None;
    }

    /// Keep the previous selection and remember the rejected input.
    pub fn reject(&mut self, raw: &str) {
        self.invalid = Some(raw.to_string());
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid.is_some()
    }

    pub fn begin_edit(&mut self) {
        self.editing = true;
        self.buffer.set(&self.value);
    }

    /// Finish editing and hand back the typed text.
    pub fn end_edit(&mut self) -> String {
        self.editing = false;
        let text = self.buffer.text().to_string();
        self.buffer.clear();
        text
    }

    pub fn cancel_edit(&mut self) {
        self.editing = false;
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::parse_timestamp;

    #[test]
    fn test_today_shows_now() {
        let now = parse_timestamp("2025-01-02T03:04:05").unwrap();
        let input = DateInputState::new(DateSelection::Today, now);
        assert_eq!(input.value, "2025-01-02T03:04:05");
        assert!(!input.is_invalid());
    }

    #[test]
    fn test_reject_keeps_value() {
        let now = parse_timestamp("2025-01-02T03:04:05").unwrap();
        let mut input = DateInputState::new(DateSelection::Today, now);
        input.reject("garbage");
        assert_eq!(input.value, "2025-01-02T03:04:05");
        assert_eq!(input.invalid.as_deref(), Some("garbage"));

        let t = parse_timestamp("2020-01-01").unwrap();
        input.accept(DateSelection::Explicit(t), now);
        assert_eq!(input.value, "2020-01-01T00:00:00");
        assert!(!input.is_invalid());
    }

    #[test]
    fn test_edit_starts_from_value() {
        let now = parse_timestamp("2025-01-02T03:04:05").unwrap();
        let mut input = DateInputState::new(DateSelection::Today, now);
        input.begin_edit();
        assert!(input.editing);
        input.buffer.delete_back();
        input.buffer.insert_char('9');
        assert_eq!(input.end_edit(), "2025-01-02T03:04:09");
        assert!(!input.editing);
        assert!(input.buffer.is_empty());
    }
}
