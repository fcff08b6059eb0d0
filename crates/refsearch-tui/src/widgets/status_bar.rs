//! Status line — one row under the results showing the search phase, row
//! count, filter mode, export availability and the last notice.

use crate::theme::Theme;
use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use refsearch_core::config::FilterMode;
use refsearch_core::SearchPhase;

/// Everything the status line shows, borrowed from app state at draw time.
pub struct StatusBar<'a> {
    pub phase: &'a SearchPhase,
    pub rows: usize,
    pub mode: FilterMode,
    pub can_export: bool,
    pub export_key: char,
    pub completed_at: Option<DateTime<Local>>,
    pub notice: Option<&'a str>,
    pub theme: &'a Theme,
}

impl StatusBar<'_> {
    fn phase_span(&self) -> Span<'static> {
        let t = self.theme;
        match self.phase {
            SearchPhase::Idle => Span::styled(" idle ", t.status_muted),
            SearchPhase::Searching => Span::styled(" searching… ", t.status_muted),
            SearchPhase::Results => Span::styled(format!(" {} rows ", self.rows), t.status_ok),
            SearchPhase::Empty => Span::styled(" no results ", t.status_muted),
            SearchPhase::Failed { .. } => Span::styled(" error ", t.status_error),
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let t = self.theme;
        let sep = || Span::styled(" │ ", t.status_muted);

        let mut spans = vec![
            self.phase_span(),
            sep(),
            Span::styled(format!("filter: {}", self.mode), t.status_muted),
            sep(),
        ];

        let export_style = if self.can_export { t.status_action } else { t.status_muted };
        spans.push(Span::styled(format!("{} export csv", self.export_key), export_style));

        if let Some(at) = self.completed_at {
            spans.push(sep());
            spans.push(Span::styled(at.format("%H:%M:%S").to_string(), t.status_muted));
        }

        if let Some(notice) = self.notice {
            spans.push(sep());
            spans.push(Span::raw(notice.to_string()));
        }

        spans.push(Span::styled("  ? help", t.status_muted));

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
