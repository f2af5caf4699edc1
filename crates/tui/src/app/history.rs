use tracing::debug;

use super::App;

impl App {
    /// Up/Down in the input line. `delta` is -1 for older, +1 for newer.
    pub fn recall(&mut self, delta: i32) {
        if let Some(text) = self.history.navigate(delta, self.input.text()) {
            let text = text.to_string();
            self.input.set(&text);
            debug!(target: "tui", "history recall delta={} cursor={:?}", delta, self.history.cursor());
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::{App, Settings};

    fn app() -> App {
        App::new(Settings::default())
    }

    #[test]
    fn recall_swaps_input_and_restores_draft() {
        let mut a = app();
        a.history.record_submission("x = 1");
        a.history.record_submission("print x");
        a.input.set("half");

        a.recall(-1);
        assert_eq!(a.input.text(), "print x");
        assert_eq!(a.input.cursor(), 7);
        a.recall(-1);
        assert_eq!(a.input.text(), "x = 1");
        a.recall(-1);
        assert_eq!(a.input.text(), "x = 1");
        a.recall(1);
        assert_eq!(a.input.text(), "print x");
        a.recall(1);
        assert_eq!(a.input.text(), "half");
    }

    #[test]
    fn down_outside_browsing_leaves_input_alone() {
        let mut a = app();
        a.history.record_submission("x");
        a.input.set("draft");
        a.recall(1);
        assert_eq!(a.input.text(), "draft");
    }
}
