// Centralized UI strings and labels. ASCII-friendly by default.

use unicode_width::UnicodeWidthStr;

pub const PS1: &str = ">>> ";
pub const PS2: &str = "... ";

pub fn prompt(continuing: bool) -> &'static str {
    if continuing {
        PS2
    } else {
        PS1
    }
}

pub const INPUT_HINT: &str = "type a statement, Enter to evaluate";

pub const CLEAR_COMMAND: &str = "clear";
pub const BANNER_FAILED: &str = "(Failed to fetch banner)";

// UI block titles (keep surrounding spaces for visual padding)
pub const TITLE_CONSOLE: &str = " App Engine Console ";
pub const TITLE_HELP: &str = " Help / Shortcuts ";

pub fn highlight_label(on: bool) -> &'static str {
    if on {
        "Highlighting"
    } else {
        "Plain"
    }
}

// Status bar: settings first, then as many hints as fit in `max_width`.
pub fn build_status_line(
    session: &str,
    highlight: bool,
    history_len: usize,
    in_flight: usize,
    scroll: u16,
    max_width: u16,
) -> String {
    let mut segments: Vec<String> = Vec::new();
    segments.push(format!("[{}][{}]", session, highlight_label(highlight)));
    segments.push(format!("Hist:{}", history_len));
    if in_flight > 0 {
        segments.push(format!("Pending:{}", in_flight));
    }
    if scroll > 0 {
        segments.push(format!("+{} lines", scroll));
    }
    let hints: [&str; 4] = [
        "Up/Down: history",
        "Shift+PgUp/PgDn: scroll",
        "F4: highlighting",
        "F1: help",
    ];
    for h in hints {
        segments.push(h.to_string());
    }

    let sep = "  |  ";
    let mut out = String::new();
    let mut used = 0usize;
    for (i, seg) in segments.iter().enumerate() {
        let segw = UnicodeWidthStr::width(seg.as_str());
        let addw = segw + if i == 0 { 0 } else { UnicodeWidthStr::width(sep) };
        if used + addw > max_width as usize {
            break;
        }
        if i > 0 {
            out.push_str(sep);
            used += UnicodeWidthStr::width(sep);
        }
        out.push_str(seg);
        used += segw;
    }
    out
}

pub fn help_lines_ascii() -> &'static [&'static str] {
    &[
        "Statements",
        "  Enter: Evaluate    clear: Empty the transcript    Esc/Ctrl-C: Quit",
        "History",
        "  Up: Older statement    Down: Newer statement, then back to your edit",
        "  (ignored while Shift/Ctrl/Alt is held)",
        "Input Editing",
        "  Left/Right: Cursor move    Backspace/Delete: Delete prev/next char",
        "  Home/End or Ctrl+A/E: Line start/end    Ctrl+Left/Right: Word move",
        "  Ctrl+W: Delete prev word    Ctrl+U/K: Kill to line start/end",
        "Transcript",
        "  Shift+PgUp/PgDn or PgUp/PgDn: Page    Mouse wheel: Scroll",
        "  Ctrl+Home/End: Top/bottom",
        "Settings",
        "  F4: Toggle syntax highlighting for new statements",
        "Help",
        "  F1: Open/close this panel",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts() {
        assert_eq!(prompt(false), ">>> ");
        assert_eq!(prompt(true), "... ");
    }

    #[test]
    fn status_line_drops_hints_that_do_not_fit() {
        let s = build_status_line("default", true, 3, 0, 0, 30);
        assert_eq!(s, "[default][Highlighting]");
        let wide = build_status_line("s", false, 0, 2, 5, 200);
        assert!(wide.starts_with("[s][Plain]  |  Hist:0  |  Pending:2  |  +5 lines"));
        assert!(wide.ends_with("F1: help"));
    }
}
