use unicode_segmentation::UnicodeSegmentation;

/// Single statement line being edited. `cursor` counts graphemes.
#[derive(Clone, Debug, Default)]
pub struct InputLine {
    text: String,
    cursor: usize,
}

impl InputLine {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn len(&self) -> usize {
        self.text.graphemes(true).count()
    }

    /// Replace the whole line and park the cursor at the end.
    pub fn set(&mut self, s: &str) {
        self.text = s.to_string();
        self.cursor = self.len();
    }

    /// Empty the line, returning what was in it.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    pub fn insert(&mut self, s: &str) {
        let parts: Vec<&str> = self.text.graphemes(true).collect();
        let idx = self.cursor.min(parts.len());
        let mut next = parts[..idx].concat();
        next.push_str(s);
        next.push_str(&parts[idx..].concat());
        self.text = next;
        self.cursor = (idx + s.graphemes(true).count()).min(self.len());
    }

    pub fn delete_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let mut parts: Vec<&str> = self.text.graphemes(true).collect();
        let idx = self.cursor.min(parts.len());
        parts.remove(idx - 1);
        self.text = parts.concat();
        self.cursor = idx - 1;
    }

    pub fn delete_right(&mut self) {
        let mut parts: Vec<&str> = self.text.graphemes(true).collect();
        let idx = self.cursor.min(parts.len());
        if idx < parts.len() {
            parts.remove(idx);
            self.text = parts.concat();
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.len();
    }

    fn word_start(parts: &[&str], from: usize) -> usize {
        let mut i = from;
        while i > 0 && parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        while i > 0 && !parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        i
    }

    pub fn word_left(&mut self) {
        let parts: Vec<&str> = self.text.graphemes(true).collect();
        self.cursor = Self::word_start(&parts, self.cursor.min(parts.len()));
    }

    pub fn word_right(&mut self) {
        let parts: Vec<&str> = self.text.graphemes(true).collect();
        let mut i = self.cursor.min(parts.len());
        while i < parts.len() && parts[i].trim().is_empty() {
            i += 1;
        }
        while i < parts.len() && !parts[i].trim().is_empty() {
            i += 1;
        }
        self.cursor = i;
    }

    pub fn delete_prev_word(&mut self) {
        let mut parts: Vec<&str> = self.text.graphemes(true).collect();
        let end = self.cursor.min(parts.len());
        let start = Self::word_start(&parts, end);
        parts.drain(start..end);
        self.text = parts.concat();
        self.cursor = start;
    }

    pub fn kill_to_start(&mut self) {
        let parts: Vec<&str> = self.text.graphemes(true).collect();
        let end = self.cursor.min(parts.len());
        self.text = parts[end..].concat();
        self.cursor = 0;
    }

    pub fn kill_to_end(&mut self) {
        let parts: Vec<&str> = self.text.graphemes(true).collect();
        let end = self.cursor.min(parts.len());
        self.text = parts[..end].concat();
    }

    /// Text before the cursor, for caret placement.
    pub fn before_cursor(&self) -> String {
        self.text.graphemes(true).take(self.cursor).collect()
    }
}
