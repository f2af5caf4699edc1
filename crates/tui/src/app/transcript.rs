use textwrap::{wrap, Options};
use unicode_width::UnicodeWidthStr;

use crate::strings::prompt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Banner(String),
    BannerError(String),
    /// Echo of a submitted statement; `id` ties it to the pending reply.
    Statement {
        id: u64,
        text: String,
        highlighted: bool,
    },
    Output {
        text: String,
        highlighted: bool,
    },
    Prompt {
        continuing: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    Banner,
    Error,
    Statement,
    Output,
}

/// One wrapped screen line. The first `prefix_len` bytes are the prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScreenLine {
    pub kind: LineKind,
    pub text: String,
    pub prefix_len: usize,
    pub highlighted: bool,
}

#[derive(Default)]
pub struct Transcript {
    nodes: Vec<Node>,
    cache: Vec<ScreenLine>,
    cache_width: u16,
    stale: bool,
}

impl Transcript {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
        self.stale = true;
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.stale = true;
    }

    /// Swap the echoed text of statement `id` for the server's version.
    /// Returns false when the node is gone (e.g. after `clear`).
    pub fn replace_statement(&mut self, id: u64, text: String, highlighted: bool) -> bool {
        for node in self.nodes.iter_mut().rev() {
            if let Node::Statement {
                id: nid,
                text: t,
                highlighted: h,
            } = node
            {
                if *nid == id {
                    *t = text;
                    *h = highlighted;
                    self.stale = true;
                    return true;
                }
            }
        }
        false
    }

    /// Whether the most recent prompt is a continuation prompt.
    pub fn continuing(&self) -> bool {
        self.nodes
            .iter()
            .rev()
            .find_map(|n| match n {
                Node::Prompt { continuing } => Some(*continuing),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn lines(&mut self, width: u16) -> &[ScreenLine] {
        let width = width.max(1);
        if self.stale || self.cache_width != width {
            self.cache = Self::layout(&self.nodes, width as usize);
            self.cache_width = width;
            self.stale = false;
        }
        &self.cache
    }

    fn layout(nodes: &[Node], width: usize) -> Vec<ScreenLine> {
        let mut out = Vec::new();
        let mut held_prompt: Option<&'static str> = None;
        for (i, node) in nodes.iter().enumerate() {
            if !matches!(node, Node::Statement { .. }) {
                if let Some(p) = held_prompt.take() {
                    push_wrapped(&mut out, LineKind::Statement, p, "", false, width);
                }
            }
            match node {
                Node::Prompt { continuing } => {
                    // the newest prompt is drawn by the input box
                    if i + 1 < nodes.len() {
                        held_prompt = Some(prompt(*continuing));
                    }
                }
                Node::Statement {
                    text, highlighted, ..
                } => {
                    let p = held_prompt.take().unwrap_or("");
                    // highlighted code comes back as a <pre> block
                    let body = text.strip_suffix('\n').unwrap_or(text);
                    push_wrapped(&mut out, LineKind::Statement, p, body, *highlighted, width);
                }
                Node::Output { text, highlighted } => {
                    if let Some(body) = block_body(text) {
                        push_wrapped(&mut out, LineKind::Output, "", body, *highlighted, width);
                    }
                }
                Node::Banner(text) => {
                    if let Some(body) = block_body(text) {
                        push_wrapped(&mut out, LineKind::Banner, "", body, false, width);
                    }
                }
                Node::BannerError(text) => {
                    push_wrapped(&mut out, LineKind::Error, "", text, false, width);
                }
            }
        }
        out
    }
}

// Preformatted blocks render like <pre>: one trailing newline is not a line.
fn block_body(text: &str) -> Option<&str> {
    let body = text.strip_suffix('\n').unwrap_or(text);
    if text.is_empty() {
        None
    } else {
        Some(body)
    }
}

fn push_wrapped(
    out: &mut Vec<ScreenLine>,
    kind: LineKind,
    prompt: &str,
    text: &str,
    highlighted: bool,
    width: usize,
) {
    let indent = " ".repeat(UnicodeWidthStr::width(prompt));
    for (n, raw) in text.split('\n').enumerate() {
        let lead = if n == 0 { prompt } else { indent.as_str() };
        let full = format!("{}{}", lead, raw.trim_end_matches('\r'));
        let opts = Options::new(width).subsequent_indent(&indent);
        for (j, piece) in wrap(&full, opts).into_iter().enumerate() {
            let prefix_len = if j == 0 { lead.len() } else { indent.len() };
            out.push(ScreenLine {
                kind,
                prefix_len: prefix_len.min(piece.len()),
                text: piece.into_owned(),
                highlighted,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(t: &mut Transcript, width: u16) -> Vec<String> {
        t.lines(width).iter().map(|l| l.text.clone()).collect()
    }

    #[test]
    fn prompt_joins_following_statement() {
        let mut t = Transcript::default();
        t.push(Node::Banner("Python 2.5\n".into()));
        t.push(Node::Prompt { continuing: false });
        t.push(Node::Statement {
            id: 0,
            text: "1 + 1".into(),
            highlighted: false,
        });
        t.push(Node::Output {
            text: "2\n".into(),
            highlighted: false,
        });
        t.push(Node::Prompt { continuing: false });
        assert_eq!(texts(&mut t, 80), vec!["Python 2.5", ">>> 1 + 1", "2"]);
        let stmt = &t.lines(80)[1];
        assert_eq!(stmt.kind, LineKind::Statement);
        assert_eq!(&stmt.text[..stmt.prefix_len], ">>> ");
    }

    #[test]
    fn continuation_prompt_and_empty_output() {
        let mut t = Transcript::default();
        t.push(Node::Prompt { continuing: true });
        t.push(Node::Statement {
            id: 3,
            text: "    pass".into(),
            highlighted: false,
        });
        t.push(Node::Output {
            text: String::new(),
            highlighted: false,
        });
        t.push(Node::Prompt { continuing: false });
        assert_eq!(texts(&mut t, 80), vec!["...     pass"]);
        assert!(!t.continuing());
    }

    #[test]
    fn statement_trailing_newline_is_not_a_line() {
        let mut t = Transcript::default();
        t.push(Node::Prompt { continuing: false });
        t.push(Node::Statement {
            id: 0,
            text: "x = 1\n".into(),
            highlighted: true,
        });
        t.push(Node::Prompt { continuing: false });
        assert_eq!(texts(&mut t, 80), vec![">>> x = 1"]);
    }

    #[test]
    fn replace_statement_by_id() {
        let mut t = Transcript::default();
        for id in 0..3 {
            t.push(Node::Statement {
                id,
                text: format!("raw{}", id),
                highlighted: false,
            });
        }
        assert!(t.replace_statement(1, "served".into(), true));
        assert!(!t.replace_statement(9, "nope".into(), false));
        assert_eq!(
            t.nodes()[1],
            Node::Statement {
                id: 1,
                text: "served".into(),
                highlighted: true
            }
        );
    }

    #[test]
    fn long_output_wraps() {
        let mut t = Transcript::default();
        t.push(Node::Output {
            text: "aaaa bbbb cccc".into(),
            highlighted: false,
        });
        assert_eq!(texts(&mut t, 9), vec!["aaaa bbbb", "cccc"]);
        assert_eq!(t.lines(80).len(), 1);
    }

    #[test]
    fn banner_error_is_marked() {
        let mut t = Transcript::default();
        t.push(Node::BannerError("(Failed to fetch banner)".into()));
        let lines = t.lines(40);
        assert_eq!(lines[0].kind, LineKind::Error);
    }
}
