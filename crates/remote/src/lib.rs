pub mod console;

pub use console::client::HttpEvaluator;
pub use console::config::ConsoleConfig;
