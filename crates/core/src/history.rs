use tracing::trace;

/// Statement history with shell-style Up/Down browsing.
///
/// While browsing, the text that was in the input line when browsing began is
/// kept aside as the pending line and handed back once the user steps past the
/// newest entry.
#[derive(Debug, Default, Clone)]
pub struct History {
    buffer: Vec<String>,
    cursor: Option<usize>,
    pending: String,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a submitted statement and leave browsing mode.
    pub fn record_submission(&mut self, line: &str) {
        self.buffer.push(line.to_string());
        self.cursor = None;
        self.pending.clear();
    }

    /// Step through the history. `delta` is -1 for older, +1 for newer; any
    /// other value is ignored.
    ///
    /// `live` is the text currently in the input line. Returns the text the
    /// input line should now show, or `None` to leave it untouched.
    pub fn navigate(&mut self, delta: i32, live: &str) -> Option<&str> {
        if !matches!(delta, -1 | 1) || self.buffer.is_empty() {
            return None;
        }
        let last = self.buffer.len() - 1;

        let Some(cursor) = self.cursor else {
            self.pending = live.to_string();
            if delta > 0 {
                return None;
            }
            self.cursor = Some(last);
            trace!(target: "history", "browse start at {}", last);
            return Some(&self.buffer[last]);
        };

        if cursor == 0 && delta < 0 {
            return None;
        }
        if cursor == last && delta > 0 {
            self.cursor = None;
            trace!(target: "history", "browse end, restoring pending line");
            return Some(&self.pending);
        }

        let next = if delta < 0 { cursor - 1 } else { cursor + 1 };
        self.cursor = Some(next);
        Some(&self.buffer[next])
    }

    pub fn older(&mut self, live: &str) -> Option<&str> {
        self.navigate(-1, live)
    }

    pub fn newer(&mut self, live: &str) -> Option<&str> {
        self.navigate(1, live)
    }

    pub fn is_browsing(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn entries(&self) -> &[String] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(lines: &[&str]) -> History {
        let mut h = History::new();
        for l in lines {
            h.record_submission(l);
        }
        h
    }

    #[test]
    fn empty_buffer_never_changes() {
        let mut h = History::new();
        assert_eq!(h.navigate(-1, "typing"), None);
        assert_eq!(h.navigate(1, "typing"), None);
        assert_eq!(h.cursor(), None);
        assert_eq!(h.pending(), "");
    }

    #[test]
    fn up_walks_back_and_stops_at_oldest() {
        let mut h = with(&["a", "b"]);
        assert_eq!(h.navigate(-1, "live"), Some("b"));
        assert_eq!(h.navigate(-1, "b"), Some("a"));
        assert_eq!(h.navigate(-1, "a"), None);
        assert_eq!(h.cursor(), Some(0));
    }

    #[test]
    fn down_walks_forward_and_restores_pending() {
        let mut h = with(&["a", "b"]);
        h.older("half typed");
        h.older("b");
        assert_eq!(h.navigate(1, "a"), Some("b"));
        assert_eq!(h.navigate(1, "b"), Some("half typed"));
        assert!(!h.is_browsing());
    }

    #[test]
    fn down_without_browsing_is_no_change() {
        let mut h = with(&["a"]);
        assert_eq!(h.navigate(1, "live"), None);
        assert_eq!(h.cursor(), None);
        // a later Up captures the live text again
        assert_eq!(h.older("other"), Some("a"));
        assert_eq!(h.pending(), "other");
    }

    #[test]
    fn submission_resets_browsing() {
        let mut h = with(&["a", "b", "c"]);
        h.older("draft");
        h.older("c");
        h.record_submission("d");
        assert_eq!(h.cursor(), None);
        assert_eq!(h.pending(), "");
        assert_eq!(h.entries(), ["a", "b", "c", "d"]);
        assert_eq!(h.older(""), Some("d"));
    }

    #[test]
    fn zero_and_large_deltas_are_ignored() {
        let mut h = with(&["a", "b"]);
        assert_eq!(h.navigate(0, "live"), None);
        assert_eq!(h.navigate(-2, "live"), None);
        assert_eq!(h.navigate(5, "live"), None);
        assert_eq!(h.cursor(), None);
        assert_eq!(h.pending(), "");

        h.older("live");
        assert_eq!(h.navigate(0, "b"), None);
        assert_eq!(h.cursor(), Some(1));
        assert_eq!(h.pending(), "live");
    }

    #[test]
    fn empty_statements_are_kept() {
        let mut h = with(&["", "x"]);
        assert_eq!(h.older("draft"), Some("x"));
        assert_eq!(h.older("x"), Some(""));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn single_entry_round_trip() {
        let mut h = with(&["only"]);
        assert_eq!(h.older("draft"), Some("only"));
        assert_eq!(h.older("only"), None);
        assert_eq!(h.newer("only"), Some("draft"));
        assert_eq!(h.newer("draft"), None);
    }
}
