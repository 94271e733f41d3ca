//! Multi-field input form

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use super::{edit_text, paste_text, KeyOutcome, Modal};

/// A labelled field with its current value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: String,
    pub value: String,
}

impl FormField {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Form {
    pub title: String,
    pub fields: Vec<FormField>,
    pub focused: usize,
}

impl Form {
    pub fn new(title: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            title: title.into(),
            fields,
            focused: 0,
        }
    }

    fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    fn focus_previous(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
    }

    fn values(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.value.clone()).collect()
    }

    fn label_width(&self) -> usize {
        self.fields
            .iter()
            .map(|f| f.label.chars().count())
            .max()
            .unwrap_or(0)
    }
}

impl Widget for &Form {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let width = self.label_width();
        let lines = self
            .fields
            .iter()
            .enumerate()
            .flat_map(|(i, field)| {
                let focused = i == self.focused;
                let value_style = if focused {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                let cursor = if focused { "_" } else { "" };
                [
                    Line::from(vec![
                        Span::styled(
                            format!("{:>width$}: ", field.label, width = width),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(format!("{}{}", field.value, cursor), value_style),
                    ]),
                    Line::default(),
                ]
            })
            .collect::<Vec<_>>();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .title(self.title.as_str())
                    .borders(Borders::ALL),
            )
            .render(area, buf);
    }
}

impl Modal for Form {
    type Output = Vec<String>;

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome<Vec<String>> {
        match key.code {
            KeyCode::Esc => KeyOutcome::Cancel,
            KeyCode::Enter => KeyOutcome::Submit(self.values()),
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                KeyOutcome::Continue
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_previous();
                KeyOutcome::Continue
            }
            _ => {
                if let Some(field) = self.fields.get_mut(self.focused) {
                    edit_text(&mut field.value, &key);
                }
                KeyOutcome::Continue
            }
        }
    }

    fn handle_paste(&mut self, text: &str) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            paste_text(&mut field.value, text);
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        Widget::render(self, area, buf);
    }

    fn hints(&self) -> &'static str {
        "Tab/Up/Down next field • Enter save • Esc cancel"
    }

    fn size(&self) -> (u16, u16) {
        (80, 60)
    }
}
