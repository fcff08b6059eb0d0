//! refsearch TUI — ratatui application shell.

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::App;

use refsearch_core::config::Config;
use refsearch_store::{RecordSource, Searcher};
use tokio::runtime::Handle;

/// Start the TUI. Searches are spawned on `runtime`; the calling thread runs
/// the terminal loop and must not be a runtime worker.
pub fn run<S: RecordSource>(
    config: Config,
    searcher: Searcher<S>,
    runtime: Handle,
) -> anyhow::Result<()> {
    let theme = theme::Theme::by_name(&config.display.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.display.theme, "unknown theme, using default");
        theme::Theme::load_default()
    });
    App::new(config, theme, searcher, runtime).run()
}
