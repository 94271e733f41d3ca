//! File browser for picking a local file

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{
    Block, Borders, Clear, List, ListItem, ListState, Paragraph, StatefulWidget, Widget,
};
use std::fs;
use std::path::{Path, PathBuf};

use super::{KeyOutcome, Modal};

/// Name shown for the parent directory
const PARENT: &str = "..";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Directory listing with directories first, both groups sorted by name
pub fn list_dir(dir: &Path) -> std::io::Result<Vec<FileEntry>> {
    let mut entries = Vec::new();
    if dir.parent().is_some() {
        entries.push(FileEntry {
            name: PARENT.to_string(),
            is_dir: true,
        });
    }

    let mut listed = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| FileEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: entry.path().is_dir(),
        })
        .collect::<Vec<_>>();
    listed.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
    entries.extend(listed);
    Ok(entries)
}

/// File selection widget
#[derive(Debug, Clone)]
pub struct FileSelect {
    pub dir: PathBuf,
    pub entries: Vec<FileEntry>,
    pub selected: usize,
    error: Option<String>,
}

impl FileSelect {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let mut select = Self {
            dir: dir.into(),
            entries: Vec::new(),
            selected: 0,
            error: None,
        };
        select.reload();
        select
    }

    fn reload(&mut self) {
        self.selected = 0;
        match list_dir(&self.dir) {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("Cannot list {:?}: {}", self.dir, e);
                self.entries = Vec::new();
                self.error = Some(format!("Cannot read directory: {}", e));
            }
        }
    }

    pub fn select_next(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + 1) % self.entries.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.entries.is_empty() {
            if self.selected == 0 {
                self.selected = self.entries.len() - 1;
            } else {
                self.selected -= 1;
            }
        }
    }

    fn go_up(&mut self) {
        if let Some(parent) = self.dir.parent() {
            self.dir = parent.to_path_buf();
            self.reload();
        }
    }

    /// Descend into a directory, or return the chosen file's path
    fn open_selected(&mut self) -> Option<PathBuf> {
        let entry = self.entries.get(self.selected)?.clone();
        if entry.name == PARENT {
            self.go_up();
            None
        } else if entry.is_dir {
            self.dir = self.dir.join(&entry.name);
            self.reload();
            None
        } else {
            Some(self.dir.join(&entry.name))
        }
    }
}

impl Widget for &FileSelect {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::default()
            .title(format!(" {} ", self.dir.display()))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|e| {
                if e.is_dir {
                    ListItem::new(format!("{}/", e.name))
                } else {
                    ListItem::new(e.name.clone())
                }
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD))
            .highlight_symbol("> ");

        let mut state = ListState::default();
        if !self.entries.is_empty() {
            state.select(Some(self.selected.min(self.entries.len() - 1)));
        }
        StatefulWidget::render(list, chunks[0], buf, &mut state);

        if let Some(error) = &self.error {
            Paragraph::new(error.as_str()).render(chunks[1], buf);
        }
    }
}

impl Modal for FileSelect {
    type Output = PathBuf;

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome<PathBuf> {
        match key.code {
            KeyCode::Esc => KeyOutcome::Cancel,
            KeyCode::Enter | KeyCode::Right => match self.open_selected() {
                Some(path) => KeyOutcome::Submit(path),
                None => KeyOutcome::Continue,
            },
            KeyCode::Backspace | KeyCode::Left => {
                self.go_up();
                KeyOutcome::Continue
            }
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
                self.selected = self.entries.len().saturating_sub(1);
                KeyOutcome::Continue
            }
            _ => KeyOutcome::Continue,
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        Widget::render(self, area, buf);
    }

    fn hints(&self) -> &'static str {
        "Up/Down select • Enter open/choose • Backspace parent • Esc cancel"
    }

    fn size(&self) -> (u16, u16) {
        (80, 70)
    }
}
