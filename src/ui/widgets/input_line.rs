//! Single-line text input

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

use super::{edit_text, paste_text, KeyOutcome, Modal};

/// Longest tail of the input shown before it gets elided
const MAX_DISPLAY_CHARS: usize = 512;

#[derive(Debug, Clone)]
pub struct InputLine {
    pub prompt: String,
    pub value: String,
}

impl InputLine {
    pub fn new(prompt: impl Into<String>, initial: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            value: initial.into(),
        }
    }

    fn display(&self) -> String {
        let total = self.value.chars().count();
        if total <= MAX_DISPLAY_CHARS {
            return self.value.clone();
        }
        let tail: String = self.value.chars().skip(total - MAX_DISPLAY_CHARS).collect();
        format!("...{}", tail)
    }
}

impl Widget for &InputLine {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let content = format!("{}\n\n> {}_", self.prompt, self.display());
        Paragraph::new(content)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

impl Modal for InputLine {
    type Output = String;

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome<String> {
        match key.code {
            KeyCode::Esc => KeyOutcome::Cancel,
            KeyCode::Enter => KeyOutcome::Submit(self.value.clone()),
            _ => {
                edit_text(&mut self.value, &key);
                KeyOutcome::Continue
            }
        }
    }

    fn handle_paste(&mut self, text: &str) {
        paste_text(&mut self.value, text);
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        Widget::render(self, area, buf);
    }

    fn hints(&self) -> &'static str {
        "Enter submit • Esc cancel • Ctrl+U clear • Ctrl+W delete word"
    }

    fn size(&self) -> (u16, u16) {
        (70, 30)
    }
}
