//! Yes/no confirmation

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

use super::{KeyOutcome, Modal};

#[derive(Debug, Clone)]
pub struct YesNo {
    pub question: String,
    pub yes: bool,
}

impl YesNo {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            yes: true,
        }
    }
}

impl Widget for &YesNo {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        Paragraph::new(self.question.as_str())
            .wrap(Wrap { trim: false })
            .render(chunks[0], buf);

        let selected = Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD);
        let (yes_style, no_style) = if self.yes {
            (selected, Style::default())
        } else {
            (Style::default(), selected)
        };
        Paragraph::new(Line::from(vec![
            Span::styled("< Yes >", yes_style),
            Span::raw("   "),
            Span::styled("< No >", no_style),
        ]))
        .centered()
        .render(chunks[1], buf);
    }
}

impl Modal for YesNo {
    type Output = bool;

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome<bool> {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.yes = !self.yes;
                KeyOutcome::Continue
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => KeyOutcome::Submit(true),
            KeyCode::Char('n') | KeyCode::Char('N') => KeyOutcome::Submit(false),
            KeyCode::Enter => KeyOutcome::Submit(self.yes),
            KeyCode::Esc => KeyOutcome::Cancel,
            _ => KeyOutcome::Continue,
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        Widget::render(self, area, buf);
    }

    fn hints(&self) -> &'static str {
        "Left/Right switch • y/n • Enter confirm • Esc no"
    }

    fn size(&self) -> (u16, u16) {
        (60, 30)
    }
}
