use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
    },
    Frame,
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::app::transcript::{LineKind, ScreenLine};
use crate::app::App;
use crate::strings::{
    build_status_line, help_lines_ascii, prompt, INPUT_HINT, TITLE_CONSOLE, TITLE_HELP,
};
use crate::theme::THEME;

const INPUT_MAX_LINES: u16 = 6;

pub fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let inner_width = area.width.saturating_sub(2);
    let ps = prompt(app.transcript.continuing());
    let input_full = format!("{}{}", ps, app.input.text());
    let input_lines = (measure_total_lines(&input_full, inner_width) as u16).clamp(1, INPUT_MAX_LINES);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(input_lines + 2),
        ])
        .split(area);

    app.transcript_area = Some(chunks[0]);
    draw_transcript(f, chunks[0], app);
    draw_status(f, chunks[1], app);
    draw_input(f, chunks[2], app, ps, input_lines);

    if app.show_help {
        draw_help(f, area);
    }
}

fn line_style(l: &ScreenLine) -> Style {
    match (l.kind, l.highlighted) {
        (LineKind::Statement, false) => Style::default().fg(THEME.statement),
        (LineKind::Statement, true) => Style::default().fg(THEME.statement_highlighted),
        (LineKind::Output, false) => Style::default(),
        (LineKind::Output, true) => Style::default().fg(THEME.output_highlighted),
        (LineKind::Banner, _) => Style::default().fg(THEME.banner),
        (LineKind::Error, _) => Style::default()
            .fg(THEME.error)
            .add_modifier(Modifier::ITALIC),
    }
}

fn draw_transcript(f: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .title(TITLE_CONSOLE)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(THEME.border));
    let inner_w = area.width.saturating_sub(2);
    let inner_h = area.height.saturating_sub(2) as usize;
    app.viewport = inner_h as u16;

    let total = app.transcript.lines(inner_w).len();
    let start = app.scroll_window(total, inner_h);
    let prompt_style = Style::default()
        .fg(THEME.prompt)
        .add_modifier(Modifier::BOLD);

    let visible: Vec<Line> = app
        .transcript
        .lines(inner_w)
        .iter()
        .skip(start)
        .take(inner_h)
        .map(|l| {
            let cut = if l.text.is_char_boundary(l.prefix_len) {
                l.prefix_len
            } else {
                0
            };
            let (head, body) = l.text.split_at(cut);
            let mut spans = Vec::with_capacity(2);
            if !head.is_empty() {
                spans.push(Span::styled(head.to_string(), prompt_style));
            }
            spans.push(Span::styled(body.to_string(), line_style(l)));
            Line::from(spans)
        })
        .collect();

    f.render_widget(Paragraph::new(visible).block(block), area);

    if total > inner_h {
        let inner = Rect {
            x: area.x.saturating_add(1),
            y: area.y.saturating_add(1),
            width: inner_w,
            height: inner_h as u16,
        };
        let mut sb_state = ScrollbarState::new(total.saturating_sub(inner_h)).position(start);
        let sb = Scrollbar::default().orientation(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(sb, inner, &mut sb_state);
    }
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let tips = build_status_line(
        &app.settings.session,
        app.settings.highlight,
        app.history.len(),
        app.in_flight,
        app.scroll,
        area.width,
    );
    let para = Paragraph::new(Line::from(Span::styled(
        tips,
        Style::default().fg(THEME.hint),
    )));
    f.render_widget(para, area);
}

fn draw_input(f: &mut Frame, area: Rect, app: &App, ps: &str, visible_lines: u16) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(THEME.border));
    let inner_width = area.width.saturating_sub(2);

    let before = format!("{}{}", ps, app.input.before_cursor());
    let graphemes: Vec<&str> = before.graphemes(true).collect();
    let (line_idx, col) = measure_prefix_line_col(&graphemes, graphemes.len(), inner_width);
    let offset_y = line_idx.saturating_sub(visible_lines.saturating_sub(1));

    let text = Line::from(vec![
        Span::styled(
            ps.to_string(),
            Style::default()
                .fg(THEME.prompt)
                .add_modifier(Modifier::BOLD),
        ),
        if app.input.is_empty() {
            Span::styled(INPUT_HINT, Style::default().fg(THEME.hint))
        } else {
            Span::raw(app.input.text().to_string())
        },
    ]);
    let para = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((offset_y, 0));
    f.render_widget(para, area);

    if !app.show_help {
        let x = area.x + 1 + col;
        let y = area.y + 1 + line_idx.saturating_sub(offset_y);
        f.set_cursor_position(Position::new(x, y));
    }
}

fn draw_help(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(70, 70, area);
    let block = Block::default()
        .title(Span::styled(
            TITLE_HELP,
            Style::default()
                .fg(THEME.prompt)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    let lines = help_lines_ascii()
        .iter()
        .map(|s| Line::from(*s))
        .collect::<Vec<Line>>();
    let para = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, popup_area);
    f.render_widget(para, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1]);
    horiz[1]
}

fn measure_total_lines(s: &str, width: u16) -> usize {
    let graphemes: Vec<&str> = s.graphemes(true).collect();
    measure_prefix_line_col(&graphemes, graphemes.len(), width).0 as usize + 1
}

// Character-wrapped position of the caret after `upto` graphemes.
fn measure_prefix_line_col(graphemes: &[&str], upto: usize, width: u16) -> (u16, u16) {
    if width == 0 {
        return (0, 0);
    }
    let mut line = 0usize;
    let mut col = 0usize;
    for g in graphemes.iter().take(upto) {
        if *g == "\n" {
            line += 1;
            col = 0;
            continue;
        }
        let w = UnicodeWidthStr::width(*g);
        if col + w > width as usize {
            line += 1;
            col = 0;
        }
        col += w;
    }
    (line as u16, col as u16)
}
