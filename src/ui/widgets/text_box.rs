//! Scrollable message box

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use super::{KeyOutcome, Modal};

/// Rows moved by PageUp/PageDown
const PAGE: usize = 10;

/// Read-only text shown until the user dismisses it
#[derive(Debug, Clone)]
pub struct TextBox {
    pub title: String,
    pub lines: Vec<String>,
    pub scroll: usize,
    /// Short notices get a small box, file and list views a large one
    pub large: bool,
}

impl TextBox {
    pub fn message(text: &str) -> Self {
        Self {
            title: String::new(),
            lines: text.lines().map(str::to_string).collect(),
            scroll: 0,
            large: false,
        }
    }

    pub fn scrollable(text: &str, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: text.lines().map(str::to_string).collect(),
            scroll: 0,
            large: true,
        }
    }

    fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    fn scroll_by(&mut self, delta: isize) {
        let next = self.scroll as isize + delta;
        self.scroll = next.clamp(0, self.max_scroll() as isize) as usize;
    }
}

impl Widget for &TextBox {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let text = Text::from(
            self.lines
                .iter()
                .map(|l| Line::from(l.clone()))
                .collect::<Vec<_>>(),
        );

        let mut block = Block::default().borders(Borders::ALL);
        if !self.title.is_empty() {
            block = block.title(self.title.as_str());
        }

        Paragraph::new(text)
            .block(block)
            .scroll((self.scroll.min(u16::MAX as usize) as u16, 0))
            .render(area, buf);
    }
}

impl Modal for TextBox {
    type Output = ();

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome<()> {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => KeyOutcome::Submit(()),
            KeyCode::Esc | KeyCode::Char('q') => KeyOutcome::Cancel,
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_by(-1);
                KeyOutcome::Continue
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_by(1);
                KeyOutcome::Continue
            }
            KeyCode::PageUp => {
                self.scroll_by(-(PAGE as isize));
                KeyOutcome::Continue
            }
            KeyCode::PageDown => {
                self.scroll_by(PAGE as isize);
                KeyOutcome::Continue
            }
            KeyCode::Home => {
                self.scroll = 0;
                KeyOutcome::Continue
            }
            KeyCode::End => {
                self.scroll = self.max_scroll();
                KeyOutcome::Continue
            }
            _ => KeyOutcome::Continue,
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        Widget::render(self, area, buf);
    }

    fn hints(&self) -> &'static str {
        if self.large {
            "Up/Down/PgUp/PgDn scroll • Enter or Esc close"
        } else {
            "Enter OK"
        }
    }

    fn size(&self) -> (u16, u16) {
        if self.large {
            (90, 85)
        } else {
            (60, 30)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::widgets::key;

    #[test]
    fn test_scroll_is_clamped() {
        let text = (0..30).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let mut view = TextBox::scrollable(&text, " Peers ");
        view.handle_key(key(KeyCode::Up));
        assert_eq!(view.scroll, 0);
        view.handle_key(key(KeyCode::PageDown));
        view.handle_key(key(KeyCode::Down));
        assert_eq!(view.scroll, 11);
        view.handle_key(key(KeyCode::PageDown));
        view.handle_key(key(KeyCode::PageDown));
        assert_eq!(view.scroll, 29);
        view.handle_key(key(KeyCode::Home));
        assert_eq!(view.scroll, 0);
    }

    #[test]
    fn test_close_keys() {
        let mut view = TextBox::message("Message sent!");
        assert_eq!(view.handle_key(key(KeyCode::Enter)), KeyOutcome::Submit(()));
        assert_eq!(view.handle_key(key(KeyCode::Esc)), KeyOutcome::Cancel);
        assert_eq!(view.handle_key(key(KeyCode::Char('x'))), KeyOutcome::Continue);
    }

    #[test]
    fn test_render_from_scroll_offset() {
        let mut view = TextBox::scrollable("first\nsecond\nthird", "File");
        view.handle_key(key(KeyCode::Down));

        let mut buf = Buffer::empty(Rect::new(0, 0, 30, 5));
        Widget::render(&view, Rect::new(0, 0, 30, 5), &mut buf);
        let rendered: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(rendered.contains("File"));
        assert!(rendered.contains("second"));
        assert!(!rendered.contains("first"));
    }
}
