//! Help popup — centred floating overlay listing all keybindings.
//!
//! Toggle with `?`; close with `?` or `Escape`.

use crate::event::Keymap;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

pub struct HelpPopup<'a> {
    theme: &'a Theme,
    keymap: &'a Keymap,
}

impl<'a> HelpPopup<'a> {
    pub fn new(theme: &'a Theme, keymap: &'a Keymap) -> Self {
        Self { theme, keymap }
    }

    fn bindings(&self) -> Vec<(String, &'static str)> {
        vec![
            ("q  /  Ctrl+c".to_string(), "Quit"),
            ("Tab".to_string(), "Switch focus: query ↔ results"),
            (self.keymap.query_focus.to_string(), "Focus query bar"),
            ("Enter".to_string(), "Search (in query bar)"),
            ("Escape".to_string(), "Return focus to results"),
            ("↑ k  /  ↓ j".to_string(), "Move row cursor"),
            ("← h  /  → l".to_string(), "Scroll columns"),
            ("PageUp  /  Ctrl+u".to_string(), "Page up"),
            ("PageDown / Ctrl+d".to_string(), "Page down"),
            ("g  /  G".to_string(), "First / last row"),
            (self.keymap.export.to_string(), "Export results to CSV"),
            (":".to_string(), "Command line (:help, :w, :theme ...)"),
            ("?".to_string(), "Toggle this help popup"),
        ]
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(72, 17, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" refsearch — keybindings (? to close) ")
            .border_style(self.theme.border_focused);

        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines: Vec<Line> = self
            .bindings()
            .into_iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(
                        format!("  {key:<22}"),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(desc),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
