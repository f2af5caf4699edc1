use std::io::{stdout, Write};

use anyhow::Result;
use crossterm::{
    cursor::SetCursorStyle,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::error;

/// Raw mode, alternate screen and mouse capture for the lifetime of the value.
///
/// Bracketed paste is on so a pasted multi-line block arrives as one
/// `Event::Paste` instead of a run of Enter keys that would each submit a
/// statement.
pub struct TerminalGuard {
    pub terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
}

impl TerminalGuard {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut out = stdout();
        execute!(
            out,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste,
            SetCursorStyle::SteadyBar
        )?;
        restore_on_panic();
        let terminal = Terminal::new(CrosstermBackend::new(out))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = leave(self.terminal.backend_mut());
        let _ = self.terminal.show_cursor();
        let _ = disable_raw_mode();
    }
}

fn leave<W: Write>(out: &mut W) -> std::io::Result<()> {
    execute!(
        out,
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste,
        SetCursorStyle::DefaultUserShape
    )
}

// The hook runs before unwinding reaches the guard's Drop; restore the shell
// first so the panic message is readable.
fn restore_on_panic() {
    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = leave(&mut stdout());
        let _ = disable_raw_mode();
        error!(target: "tui", "panic: {}", info);
        prev(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::leave;

    #[test]
    fn leave_turns_off_alt_screen_and_paste_mode() {
        let mut buf: Vec<u8> = Vec::new();
        leave(&mut buf).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.contains("\x1b[?1049l"));
        assert!(s.contains("\x1b[?2004l"));
    }
}
