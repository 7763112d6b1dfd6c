/// Single-line edit buffer for a date field.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    chars: Vec<char>,
    /// Char index, `0..=chars.len()`.
    cursor: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    /// Replace the contents, cursor at end.
    pub fn set(&mut self, s: &str) {
        self.chars = s.chars().collect();
        self.cursor = self.chars.len();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Insert at the cursor. Control characters are ignored.
    pub fn insert_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    /// Delete back to the previous separator (`-`, `:`, `T`, `.`, space),
    /// like Ctrl+W but stopping at date/time boundaries.
    pub fn delete_word_back(&mut self) {
        let is_sep = |c: char| matches!(c, '-' | ':' | 'T' | '.' | ' ');
        let mut start = self.cursor;
        while start > 0 && is_sep(self.chars[start - 1]) {
            start -= 1;
        }
        while start > 0 && !is_sep(self.chars[start - 1]) {
            start -= 1;
        }
        self.chars.drain(start..self.cursor);
        self.cursor = start;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.chars.len();
    }
}
