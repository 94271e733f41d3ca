//! Menu list widget

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{
    Block, Borders, Clear, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap,
};

use super::{KeyOutcome, Modal};

/// One menu entry: a short tag returned on selection plus a label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuChoice {
    pub tag: String,
    pub label: String,
}

impl MenuChoice {
    pub fn new(tag: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            label: label.into(),
        }
    }
}

/// Menu list widget
#[derive(Debug, Clone)]
pub struct MenuList {
    pub prompt: String,
    pub choices: Vec<MenuChoice>,
    pub selected: usize,
}

impl MenuList {
    pub fn new(prompt: impl Into<String>, choices: Vec<MenuChoice>) -> Self {
        Self {
            prompt: prompt.into(),
            choices,
            selected: 0,
        }
    }

    pub fn select_next(&mut self) {
        if !self.choices.is_empty() {
            self.selected = (self.selected + 1) % self.choices.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.choices.is_empty() {
            if self.selected == 0 {
                self.selected = self.choices.len() - 1;
            } else {
                self.selected -= 1;
            }
        }
    }

    pub fn selected_choice(&self) -> Option<&MenuChoice> {
        self.choices.get(self.selected)
    }

    /// Jump to the next choice whose tag starts with `c` (dialog-style hotkeys)
    fn jump_to(&mut self, c: char) {
        let len = self.choices.len();
        let hit = (1..=len)
            .map(|offset| (self.selected + offset) % len)
            .find(|&i| {
                self.choices[i]
                    .tag
                    .chars()
                    .next()
                    .is_some_and(|first| first.eq_ignore_ascii_case(&c))
            });
        if let Some(index) = hit {
            self.selected = index;
        }
    }

    fn tag_width(&self) -> usize {
        self.choices
            .iter()
            .map(|c| c.tag.chars().count())
            .max()
            .unwrap_or(0)
    }
}

impl Widget for &MenuList {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        let prompt_height = self.prompt.lines().count().max(1) as u16 + 1;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(prompt_height), Constraint::Min(1)])
            .split(inner);

        Paragraph::new(self.prompt.as_str())
            .wrap(Wrap { trim: false })
            .render(chunks[0], buf);

        let width = self.tag_width();
        let items = self
            .choices
            .iter()
            .map(|choice| {
                if choice.label.is_empty() {
                    ListItem::new(Line::from(choice.tag.clone()))
                } else {
                    ListItem::new(Line::from(format!(
                        "{:<width$}  {}",
                        choice.tag,
                        choice.label,
                        width = width
                    )))
                }
            })
            .collect::<Vec<_>>();

        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD))
            .highlight_symbol("> ");

        let mut state = ListState::default();
        if !self.choices.is_empty() {
            state.select(Some(self.selected.min(self.choices.len() - 1)));
        }

        StatefulWidget::render(list, chunks[1], buf, &mut state);
    }
}

impl Modal for MenuList {
    type Output = String;

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome<String> {
        match key.code {
            KeyCode::Esc => KeyOutcome::Cancel,
            KeyCode::Enter => match self.selected_choice() {
                Some(choice) => KeyOutcome::Submit(choice.tag.clone()),
                None => KeyOutcome::Cancel,
            },
            KeyCode::Up => {
                self.select_previous();
                KeyOutcome::Continue
            }
            KeyCode::Down | KeyCode::Tab => {
                self.select_next();
                KeyOutcome::Continue
            }
            KeyCode::Home => {
                self.selected = 0;
                KeyOutcome::Continue
            }
            KeyCode::End => {
                self.selected = self.choices.len().saturating_sub(1);
                KeyOutcome::Continue
            }
            KeyCode::Char(c) => {
                self.jump_to(c);
                KeyOutcome::Continue
            }
            _ => KeyOutcome::Continue,
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        Widget::render(self, area, buf);
    }

    fn hints(&self) -> &'static str {
        "Up/Down select • hotkey jump • Enter choose • Esc back"
    }

    fn size(&self) -> (u16, u16) {
        (80, 70)
    }
}
