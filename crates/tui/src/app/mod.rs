use aec_core::{eval::StatementRequest, markup, History};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use remote::ConsoleConfig;
use tracing::{debug, error, info};

use crate::dispatch::{Reply, Request};
use crate::strings::{BANNER_FAILED, CLEAR_COMMAND};

pub mod history;
pub mod input;
pub mod transcript;

use input::InputLine;
use transcript::{Node, Transcript};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub session: String,
    pub highlight: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&ConsoleConfig::default())
    }
}

impl From<&ConsoleConfig> for Settings {
    fn from(cfg: &ConsoleConfig) -> Self {
        Self {
            session: cfg.session.clone(),
            highlight: cfg.highlight,
        }
    }
}

/// Ids for submitted statements, unique for the lifetime of one `App`.
#[derive(Debug, Default)]
pub struct Uid(u64);

impl Uid {
    pub fn next(&mut self) -> u64 {
        let id = self.0;
        self.0 += 1;
        id
    }
}

pub struct App {
    pub transcript: Transcript,
    pub input: InputLine,
    pub history: History,
    pub settings: Settings,
    uid: Uid,
    outbox: Vec<Request>,
    pub in_flight: usize,
    /// Lines scrolled up from the bottom of the transcript.
    pub scroll: u16,
    pub viewport: u16,
    pub transcript_area: Option<Rect>,
    pub show_help: bool,
    pub should_quit: bool,
    pub dirty: bool,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let mut app = Self {
            transcript: Transcript::default(),
            input: InputLine::default(),
            history: History::new(),
            settings,
            uid: Uid::default(),
            outbox: Vec::new(),
            in_flight: 0,
            scroll: 0,
            viewport: 0,
            transcript_area: None,
            show_help: false,
            should_quit: false,
            dirty: true,
        };
        app.queue(Request::Banner);
        app
    }

    fn queue(&mut self, req: Request) {
        self.outbox.push(req);
        self.in_flight += 1;
    }

    /// Requests produced since the last call, oldest first.
    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    pub fn submit(&mut self) {
        let statement = self.input.take();
        debug!(target: "tui", "statement submitted: {:?}", statement);
        self.dirty = true;

        if statement == CLEAR_COMMAND {
            self.transcript.clear();
            self.scroll = 0;
            return;
        }

        let id = self.uid.next();
        // Placeholder until the server sends back its own rendering.
        self.transcript.push(Node::Statement {
            id,
            text: statement.clone(),
            highlighted: false,
        });
        self.history.record_submission(&statement);

        info!(target: "tui", "submit: id={} session={} highlight={} len={}", id, self.settings.session, self.settings.highlight, statement.len());
        let req = StatementRequest {
            session: self.settings.session.clone(),
            highlight: self.settings.highlight,
            code: statement,
        };
        self.queue(Request::Statement { id, req });
        self.scroll_to_bottom();
    }

    pub fn on_reply(&mut self, reply: Reply) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.dirty = true;
        match reply {
            Reply::Banner(Ok(b)) => {
                self.transcript.push(Node::Banner(markup::to_plain(&b.banner)));
                self.transcript.push(Node::Prompt { continuing: false });
            }
            Reply::Banner(Err(e)) => {
                error!(target: "tui", "banner error: {}", e);
                self.transcript.push(Node::BannerError(BANNER_FAILED.to_string()));
                self.transcript.push(Node::Prompt { continuing: false });
            }
            Reply::Statement {
                id,
                result: Err(e),
                ..
            } => {
                error!(target: "tui", "statement error: {}; id={}", e, id);
                return;
            }
            Reply::Statement {
                id,
                highlight,
                result: Ok(r),
            } => {
                if !self
                    .transcript
                    .replace_statement(id, markup::to_plain(&r.input), highlight)
                {
                    debug!(target: "tui", "statement {} no longer on screen", id);
                }
                self.transcript.push(Node::Output {
                    text: markup::to_plain(&r.output),
                    highlighted: highlight,
                });
                self.transcript.push(Node::Prompt {
                    continuing: r.continuing,
                });
            }
        }
        self.scroll_to_bottom();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Clamp the scroll position to the content and return the index of the
    /// first visible line.
    pub fn scroll_window(&mut self, total: usize, viewport: usize) -> usize {
        let max = total.saturating_sub(viewport);
        if self.scroll as usize > max {
            self.scroll = max as u16;
        }
        max - self.scroll as usize
    }

    pub fn toggle_highlight(&mut self) {
        self.settings.highlight = !self.settings.highlight;
        info!(target: "tui", "highlight set to {}", self.settings.highlight);
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.dirty = true;

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1)) {
                self.show_help = false;
            }
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let page = self.viewport.max(1);

        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Esc => self.should_quit = true,
            KeyCode::F(1) => self.show_help = true,
            KeyCode::F(4) => self.toggle_highlight(),
            KeyCode::Enter => self.submit(),

            KeyCode::Up | KeyCode::Down if !key.modifiers.is_empty() => {
                debug!(target: "tui", "ignoring keypress with a modifier key");
            }
            KeyCode::Up => self.recall(-1),
            KeyCode::Down => self.recall(1),

            KeyCode::PageUp if shift => self.scroll_up(page),
            KeyCode::PageDown if shift => self.scroll_down(page),
            KeyCode::PageUp => self.scroll_up(page),
            KeyCode::PageDown => self.scroll_down(page),
            KeyCode::Home if ctrl => self.scroll = u16::MAX,
            KeyCode::End if ctrl => self.scroll_to_bottom(),

            KeyCode::Char('a') if ctrl => self.input.home(),
            KeyCode::Char('e') if ctrl => self.input.end(),
            KeyCode::Char('u') if ctrl => self.input.kill_to_start(),
            KeyCode::Char('k') if ctrl => self.input.kill_to_end(),
            KeyCode::Char('w') if ctrl => self.input.delete_prev_word(),
            KeyCode::Left if ctrl => self.input.word_left(),
            KeyCode::Right if ctrl => self.input.word_right(),
            KeyCode::Left => self.input.left(),
            KeyCode::Right => self.input.right(),
            KeyCode::Home => self.input.home(),
            KeyCode::End => self.input.end(),
            KeyCode::Backspace => self.input.delete_left(),
            KeyCode::Delete => self.input.delete_right(),
            KeyCode::Char(ch) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                let mut buf = [0u8; 4];
                self.input.insert(ch.encode_utf8(&mut buf));
            }
            _ => {}
        }
    }

    pub fn insert_text(&mut self, s: &str) {
        self.input.insert(&s.replace('\r', ""));
        self.dirty = true;
    }
}
