mod app;
mod dispatch;
mod events;
mod logging;
mod strings;
mod terminal;
mod theme;
mod ui;

use anyhow::Result;
use remote::{ConsoleConfig, HttpEvaluator};
use terminal::TerminalGuard;
use tracing::info;

fn main() -> Result<()> {
    let _log_guard = logging::init();
    let cfg = ConsoleConfig::from_env_and_file()?;
    info!(target: "tui", "starting: server={} session={} highlight={}", cfg.base_url, cfg.session, cfg.highlight);

    let dispatcher = dispatch::Dispatcher::new(HttpEvaluator::new(&cfg)?)?;
    let mut app = app::App::new(app::Settings::from(&cfg));
    let mut term = TerminalGuard::new()?;
    events::run(&mut term.terminal, &mut app, &dispatcher)
}
