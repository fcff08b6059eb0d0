//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic.
//!
//! Searches never block the loop: each submission is spawned on the tokio
//! runtime and its outcome comes back over a channel, tagged with the
//! generation it was issued for. [`SearchSession::complete`] drops outcomes
//! for anything but the latest generation.

use crate::{
    commands::Command,
    event::{self, AppEvent, Keymap},
    theme::Theme,
    widgets::{
        command_bar::{CommandBar, CommandBarState},
        help::HelpPopup,
        query_bar::{QueryBar, QueryBarState},
        results_table::{ResultsTable, ResultsTableState},
        status_bar::StatusBar,
    },
};
use crossterm::{
    event::{self as ct_event, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    Frame, Terminal,
};
use refsearch_core::{
    config::Config,
    export::export_to_path,
    session::Completion,
    types::display_columns,
    Record, SearchSession,
};
use refsearch_store::{RecordSource, Searcher, StoreError};
use std::{io, path::PathBuf, sync::Arc, time::Duration};
use tokio::{
    runtime::Handle,
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
};

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    QueryBar,
    Results,
    /// Vim-style `:` command line is active.
    Command,
}

/// A finished search, tagged with the generation it was issued for.
#[derive(Debug)]
pub struct SearchOutcome {
    pub generation: u64,
    pub result: Result<Vec<Record>, StoreError>,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub session: SearchSession,
    pub query: QueryBarState,
    pub table: ResultsTableState,
    /// Column order for the current results, computed once per completion.
    pub columns: Vec<String>,
    pub focus: Focus,
    /// Focus state before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub theme: Theme,
    pub config: Config,
    pub keymap: Keymap,
    pub show_help: bool,
    pub command_bar: CommandBarState,
    /// One-line message for the status bar (export result, command errors).
    pub notice: Option<String>,
    pub quit: bool,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App<S> {
    state: AppState,
    searcher: Arc<Searcher<S>>,
    runtime: Handle,
    outcomes_tx: UnboundedSender<SearchOutcome>,
    outcomes_rx: UnboundedReceiver<SearchOutcome>,
}

impl<S: RecordSource> App<S> {
    pub fn new(config: Config, theme: Theme, searcher: Searcher<S>, runtime: Handle) -> Self {
        let keymap = Keymap::from_config(&config.keybindings);
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();

        let state = AppState {
            session: SearchSession::new(),
            query: QueryBarState::default(),
            table: ResultsTableState::default(),
            columns: Vec::new(),
            focus: Focus::QueryBar,
            prev_focus: Focus::QueryBar,
            theme,
            config,
            keymap,
            show_help: false,
            command_bar: CommandBarState::default(),
            notice: None,
            quit: false,
        };

        App {
            state,
            searcher: Arc::new(searcher),
            runtime,
            outcomes_tx,
            outcomes_rx,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            self.drain_outcomes();

            {
                let s = &self.state;
                let mode = self.searcher.mode();
                terminal.draw(|frame| draw(frame, s, mode))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                match ct_event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        let raw = Event::Key(key);
                        // Use insert-mode mapping when a text widget is focused
                        let app_event = if is_insert_mode(self.state.focus) {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw, &self.state.keymap)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(focus = ?self.state.focus, event = ?ev, "key event");
                            self.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) = event::to_app_event(other, &self.state.keymap) {
                            self.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn handle(&mut self, event: AppEvent) {
        // Help popup intercepts all events; only close keys pass through.
        if self.state.show_help {
            match event {
                AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit => {
                    tracing::debug!("help popup closed");
                    self.state.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match self.state.focus {
            Focus::Command => self.handle_command_bar(event),
            Focus::QueryBar => self.handle_query_bar(event),
            Focus::Results => self.handle_results(event),
        }
    }

    fn handle_command_bar(&mut self, event: AppEvent) {
        let s = &mut self.state;
        match event {
            AppEvent::Quit => s.quit = true,
            AppEvent::Escape => {
                tracing::debug!("command bar cancelled");
                s.command_bar.clear();
                s.focus = s.prev_focus;
            }
            AppEvent::Enter => match Command::parse(&s.command_bar.input) {
                Ok(cmd) => {
                    tracing::debug!(command = ?cmd, "executing command");
                    s.command_bar.clear();
                    s.focus = s.prev_focus;
                    self.execute_command(cmd);
                }
                Err(msg) if msg.is_empty() => {
                    // Empty input: just close
                    s.command_bar.clear();
                    s.focus = s.prev_focus;
                }
                Err(msg) => {
                    // Show the error; bar stays open
                    s.command_bar.error = Some(msg);
                }
            },
            other => s.command_bar.handle(&other),
        }
    }

    fn handle_query_bar(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => self.state.quit = true,
            AppEvent::Enter => {
                let raw = self.state.query.query.clone();
                self.submit(&raw);
            }
            AppEvent::Escape | AppEvent::FocusNext => {
                tracing::debug!("focus: QueryBar -> Results");
                self.state.focus = Focus::Results;
            }
            other => self.state.query.handle(&other),
        }
    }

    fn handle_results(&mut self, event: AppEvent) {
        let s = &mut self.state;
        match event {
            AppEvent::Char('?') => {
                tracing::debug!("help popup opened");
                s.show_help = true;
            }
            AppEvent::Char(':') => {
                tracing::debug!(prev_focus = ?s.focus, "entering command mode");
                s.prev_focus = s.focus;
                s.command_bar.clear();
                s.focus = Focus::Command;
            }
            AppEvent::Quit => {
                tracing::debug!("quit");
                s.quit = true;
            }
            AppEvent::FocusNext | AppEvent::QueryFocus => {
                tracing::debug!("focus -> QueryBar");
                s.focus = Focus::QueryBar;
            }
            AppEvent::Export => self.export(None),
            // Terminal resize is handled automatically by ratatui
            AppEvent::Resize(_, _) => {}
            other => {
                let rows = s.session.results().len();
                let cols = s.columns.len();
                s.table.handle(&other, rows, cols);
            }
        }
    }

    /// Execute a parsed [`Command`].
    fn execute_command(&mut self, cmd: Command) {
        match cmd {
            Command::Quit => self.state.quit = true,
            Command::Help => self.state.show_help = !self.state.show_help,
            Command::Theme(name) => match Theme::by_name(&name) {
                Some(theme) => {
                    tracing::info!(theme = %name, "theme changed");
                    self.state.theme = theme;
                }
                None => {
                    self.state.notice = Some(format!(
                        "unknown theme {name:?} (available: {})",
                        Theme::NAMES.join(", ")
                    ));
                }
            },
            Command::Export(path) => self.export(path),
            Command::Search(query) => {
                self.state.query.set(query.clone());
                self.submit(&query);
            }
            Command::Clear => {
                self.state.query.clear();
                self.submit("");
            }
        }
    }

    /// Submit `raw` to the session and, when it has terms, spawn the search.
    pub fn submit(&mut self, raw: &str) {
        self.state.notice = None;

        let Some(request) = self.state.session.submit(raw) else {
            // No terms: the session is back to idle with nothing to show.
            self.state.columns.clear();
            self.state.table.reset();
            return;
        };

        let searcher = Arc::clone(&self.searcher);
        let tx = self.outcomes_tx.clone();
        self.runtime.spawn(async move {
            let result = searcher.search(&request.terms).await;
            // The receiver only goes away when the app is shutting down.
            let _ = tx.send(SearchOutcome {
                generation: request.generation,
                result,
            });
        });
    }

    /// Apply every outcome that has arrived since the last call.
    pub fn drain_outcomes(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            if self.apply_outcome(outcome) == Completion::Applied {
                applied += 1;
            }
        }
        applied
    }

    fn apply_outcome(&mut self, outcome: SearchOutcome) -> Completion {
        let s = &mut self.state;
        let completion = s.session.complete(outcome.generation, outcome.result);
        if completion == Completion::Applied {
            s.columns = display_columns(s.session.results(), s.config.display.lead());
            s.table.reset();
        }
        completion
    }

    /// Write the current results to `path`, or the configured export path.
    /// Does nothing unless there are rows on screen.
    pub fn export(&mut self, path: Option<PathBuf>) {
        let s = &mut self.state;
        if !s.session.can_export() {
            tracing::debug!(phase = ?s.session.phase(), "export ignored: no results");
            return;
        }

        let path = path.unwrap_or_else(|| s.config.export.path.clone());
        match export_to_path(&path, s.session.results(), s.config.display.lead()) {
            Ok(rows) => {
                s.notice = Some(format!("exported {rows} rows to {}", path.display()));
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "export failed");
                s.notice = Some(format!("export failed: {err}"));
            }
        }
    }
}

/// Returns true when the current focus is on a text-input widget, meaning
/// alphabetic keys should produce characters rather than trigger shortcuts.
fn is_insert_mode(focus: Focus) -> bool {
    matches!(focus, Focus::QueryBar | Focus::Command)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState, mode: refsearch_core::config::FilterMode) {
    let area = frame.area();

    // Vertical: 3-line query bar | results | 1-line status bar
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .split(area);

    let session = &state.session;

    frame.render_widget(
        QueryBar::new(&state.query, state.focus == Focus::QueryBar, &state.theme),
        vert[0],
    );
    frame.render_widget(
        ResultsTable::new(
            &state.table,
            session.results(),
            &state.columns,
            session.phase(),
            state.focus == Focus::Results,
            &state.theme,
        )
        .lead(state.config.display.lead()),
        vert[1],
    );
    frame.render_widget(
        StatusBar {
            phase: session.phase(),
            rows: session.results().len(),
            mode,
            can_export: session.can_export(),
            export_key: state.keymap.export,
            completed_at: session.completed_at(),
            notice: state.notice.as_deref(),
            theme: &state.theme,
        },
        vert[2],
    );

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.theme, &state.keymap), area);
    }

    // Command bar overlays the bottom row of the screen
    if state.focus == Focus::Command {
        let cmd_area = Rect { y: area.bottom().saturating_sub(1), height: 1, ..area };
        frame.render_widget(CommandBar::new(&state.command_bar, &state.theme), cmd_area);
        let col = state.command_bar.cursor_col(cmd_area);
        frame.set_cursor_position((col, cmd_area.y));
        return;
    }

    // Position the terminal cursor when the query bar is focused
    if state.focus == Focus::QueryBar {
        let qb = QueryBar::new(&state.query, true, &state.theme);
        frame.set_cursor_position(qb.cursor_position(vert[0]));
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
