//! Results table — the scrollable grid of matched rows.
//!
//! # Navigation (when pane is focused)
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑` / `k` | Move cursor up one row (scrolls view if needed) |
//! | `↓` / `j` | Move cursor down one row |
//! | `←` / `h` | Scroll one column left |
//! | `→` / `l` | Scroll one column right |
//! | `PageUp` / `Ctrl+u` | Up one page |
//! | `PageDown` / `Ctrl+d` | Down one page |
//! | `g` / `G` | First / last row |
//!
//! # Scroll semantics
//!
//! `offset` = index of the first visible row, `cursor` = absolute index of
//! the highlighted row. The cursor is always kept within the visible window;
//! moving it past the edge scrolls.

use std::cell::Cell as StdCell;

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Cell, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Table, Widget,
    },
};
use refsearch_core::{Record, SearchPhase};

/// Widest a column may render before its cells are truncated.
const MAX_COLUMN_WIDTH: usize = 40;

const COLUMN_SPACING: u16 = 2;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ResultsTableState {
    /// Absolute index of the highlighted row.
    pub cursor: usize,
    /// Index of the first visible row.
    pub offset: usize,
    /// Number of leading columns scrolled off to the left.
    pub col_offset: usize,
    /// Cached from the last render so `handle()` can page correctly.
    last_height: StdCell<usize>,
}

impl Default for ResultsTableState {
    fn default() -> Self {
        Self {
            cursor: 0,
            offset: 0,
            col_offset: 0,
            last_height: StdCell::new(20),
        }
    }
}

impl ResultsTableState {
    /// Back to the top-left corner. Call whenever a new result set lands.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.offset = 0;
        self.col_offset = 0;
    }

    fn height(&self) -> usize {
        self.last_height.get().max(1)
    }

    /// Pull the window so the cursor is visible.
    fn follow_cursor(&mut self) {
        let height = self.height();
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }
    }

    /// Handle a navigation event for a table of `rows` × `columns`.
    pub fn handle(&mut self, event: &AppEvent, rows: usize, columns: usize) {
        if rows == 0 {
            return;
        }
        let last = rows - 1;
        let page = self.height();

        match event {
            AppEvent::Nav(Direction::Up) => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            AppEvent::Nav(Direction::Down) => {
                self.cursor = (self.cursor + 1).min(last);
            }
            AppEvent::Nav(Direction::Left) => {
                self.col_offset = self.col_offset.saturating_sub(1);
            }
            AppEvent::Nav(Direction::Right) => {
                if self.col_offset + 1 < columns {
                    self.col_offset += 1;
                }
            }
            AppEvent::ScrollUp => {
                self.cursor = self.cursor.saturating_sub(page);
            }
            AppEvent::ScrollDown => {
                self.cursor = (self.cursor + page).min(last);
            }
            AppEvent::ScrollToTop => {
                self.cursor = 0;
            }
            AppEvent::ScrollToBottom => {
                self.cursor = last;
            }
            _ => return,
        }

        self.follow_cursor();
        tracing::debug!(
            cursor = self.cursor,
            offset = self.offset,
            col_offset = self.col_offset,
            "results: moved"
        );
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct ResultsTable<'a> {
    state: &'a ResultsTableState,
    records: &'a [Record],
    columns: &'a [String],
    lead: Option<&'a str>,
    phase: &'a SearchPhase,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> ResultsTable<'a> {
    pub fn new(
        state: &'a ResultsTableState,
        records: &'a [Record],
        columns: &'a [String],
        phase: &'a SearchPhase,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            state,
            records,
            columns,
            lead: None,
            phase,
            focused,
            theme,
        }
    }

    /// Column that gets the accent style.
    pub fn lead(mut self, lead: Option<&'a str>) -> Self {
        self.lead = lead;
        self
    }

    fn title(&self) -> String {
        let count = self.records.len();
        match self.phase {
            SearchPhase::Searching if count > 0 => format!(" Results ({count}) · searching… "),
            SearchPhase::Searching => " Results · searching… ".to_string(),
            SearchPhase::Results => format!(" Results ({count}) "),
            _ => " Results ".to_string(),
        }
    }

    /// Placeholder shown instead of the grid when there is nothing to list.
    fn message(&self) -> Line<'static> {
        match self.phase {
            SearchPhase::Idle => Line::from(Span::styled(
                "Type one or more identifiers and press Enter to search.",
                self.theme.status_muted,
            )),
            SearchPhase::Searching => {
                Line::from(Span::styled("Searching…", self.theme.status_muted))
            }
            SearchPhase::Empty => {
                Line::from(Span::styled("No results found.", self.theme.status_muted))
            }
            SearchPhase::Failed { .. } => Line::from(Span::styled(
                "Search failed. See the debug log for details.",
                self.theme.status_error,
            )),
            SearchPhase::Results => Line::default(),
        }
    }

    fn widths(&self, visible: &[String], rows: &[Record]) -> Vec<Constraint> {
        visible
            .iter()
            .map(|col| {
                let widest = rows
                    .iter()
                    .map(|r| r.text(col).chars().count())
                    .chain(std::iter::once(col.chars().count()))
                    .max()
                    .unwrap_or(0);
                Constraint::Length(widest.min(MAX_COLUMN_WIDTH) as u16)
            })
            .collect()
    }
}

impl Widget for ResultsTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };

        let block = Block::bordered().title(self.title()).border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        if self.records.is_empty() {
            Paragraph::new(self.message()).centered().render(inner, buf);
            return;
        }

        // One row is taken by the header.
        let height = (inner.height as usize).saturating_sub(1);
        self.state.last_height.set(height);

        let total = self.records.len();
        let start = self.state.offset.min(total.saturating_sub(1));
        let end = (start + height).min(total);
        let window = &self.records[start..end];

        let col_offset = self.state.col_offset.min(self.columns.len().saturating_sub(1));
        let visible = &self.columns[col_offset..];

        let header = Row::new(visible.iter().map(|c| Cell::from(c.as_str())))
            .style(self.theme.header);

        let rows: Vec<Row> = window
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let index = start + i;
                let cells = visible.iter().map(|col| {
                    let style = if Some(col.as_str()) == self.lead {
                        self.theme.lead_column
                    } else {
                        self.theme.cell
                    };
                    Cell::from(record.text(col).into_owned()).style(style)
                });
                let mut style = self.theme.row_style(index);
                if self.focused && index == self.state.cursor {
                    style = style.patch(self.theme.selected);
                } else if index == self.state.cursor {
                    style = style.add_modifier(Modifier::BOLD);
                }
                Row::new(cells).style(style)
            })
            .collect();

        // Leave a 1-column strip for the scrollbar, inside the borders.
        let table_area = Rect { width: inner.width.saturating_sub(1), ..inner };
        let sb_area = Rect {
            x: inner.right().saturating_sub(1),
            width: 1,
            ..inner
        };

        Widget::render(
            Table::new(rows, self.widths(visible, window))
                .header(header)
                .column_spacing(COLUMN_SPACING)
                .style(Style::default()),
            table_area,
            buf,
        );

        if total > height {
            let mut sb_state = ScrollbarState::new(total)
                .position(start)
                .viewport_content_length(height);
            StatefulWidget::render(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(None)
                    .end_symbol(None),
                sb_area,
                buf,
                &mut sb_state,
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
