use std::time::{Duration, Instant};

use aec_core::eval::Evaluator;
use crossterm::event::{self, Event, MouseEventKind};
use ratatui::{backend::Backend, Terminal};
use tracing::info;

use crate::{app::App, dispatch::Dispatcher, ui};

const WHEEL_STEP: u16 = 3;

pub fn run<B: Backend, E: Evaluator + 'static>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    dispatcher: &Dispatcher<E>,
) -> anyhow::Result<()> {
    let mut last_draw = Instant::now();
    let heartbeat = Duration::from_millis(500);
    loop {
        for req in app.take_requests() {
            dispatcher.send(req);
        }
        for _ in 0..64 {
            match dispatcher.try_recv() {
                Some(reply) => app.on_reply(reply),
                None => break,
            }
        }

        if app.dirty || last_draw.elapsed() >= heartbeat {
            terminal.draw(|f| ui::draw(f, app))?;
            app.dirty = false;
            last_draw = Instant::now();
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => app.on_key(key),
                Event::Paste(s) => app.insert_text(&s),
                Event::Resize(_, _) => app.dirty = true,
                Event::Mouse(me) => {
                    let inside = app.transcript_area.is_some_and(|a| {
                        me.column >= a.x
                            && me.column < a.x + a.width
                            && me.row >= a.y
                            && me.row < a.y + a.height
                    });
                    if inside {
                        match me.kind {
                            MouseEventKind::ScrollUp => {
                                app.scroll_up(WHEEL_STEP);
                                app.dirty = true;
                            }
                            MouseEventKind::ScrollDown => {
                                app.scroll_down(WHEEL_STEP);
                                app.dirty = true;
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }

        if app.should_quit {
            info!(target: "tui", "quit with {} request(s) in flight", app.in_flight);
            break;
        }
    }
    Ok(())
}
