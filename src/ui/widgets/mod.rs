//! Dialog widgets
//!
//! Each widget owns its editing state, reacts to key events and renders
//! itself. The terminal dialog loop drives them through [`Modal`].

pub mod file_select;
pub mod form;
pub mod input_line;
pub mod menu_list;
pub mod text_box;
pub mod yes_no;

pub use file_select::{FileEntry, FileSelect};
pub use form::{Form, FormField};
pub use input_line::InputLine;
pub use menu_list::{MenuChoice, MenuList};
pub use text_box::TextBox;
pub use yes_no::YesNo;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

/// Result of feeding one key to a modal widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome<T> {
    /// Keep the dialog open
    Continue,
    Submit(T),
    Cancel,
}

/// A widget shown as a modal dialog
pub trait Modal {
    type Output;

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome<Self::Output>;

    /// Pasted text (bracketed paste); ignored unless the widget edits text
    fn handle_paste(&mut self, _text: &str) {}

    fn render(&self, area: Rect, buf: &mut Buffer);

    /// Key hints for the footer
    fn hints(&self) -> &'static str;

    /// Width and height of the dialog as percentages of the screen
    fn size(&self) -> (u16, u16) {
        (70, 60)
    }
}

pub(crate) fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.code == KeyCode::Char(c) && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Shared single-line editing: returns true when the key was consumed.
pub(crate) fn edit_text(text: &mut String, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Backspace => {
            text.pop();
            true
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            text.clear();
            true
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            while matches!(text.chars().last(), Some(c) if c.is_whitespace()) {
                text.pop();
            }
            while matches!(text.chars().last(), Some(c) if !c.is_whitespace()) {
                text.pop();
            }
            true
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            text.push(c);
            true
        }
        _ => false,
    }
}

/// Append pasted text to a single-line field, flattening newlines
pub(crate) fn paste_text(text: &mut String, pasted: &str) {
    for c in pasted.chars() {
        match c {
            '\r' | '\n' => text.push(' '),
            _ => text.push(c),
        }
    }
}

#[cfg(test)]
pub(crate) fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_text() {
        let mut text = String::new();
        for c in "hello big world".chars() {
            assert!(edit_text(&mut text, &key(KeyCode::Char(c))));
        }
        assert!(edit_text(&mut text, &key(KeyCode::Backspace)));
        assert_eq!(text, "hello big worl");

        let ctrl_w = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert!(edit_text(&mut text, &ctrl_w));
        assert_eq!(text, "hello big ");

        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert!(edit_text(&mut text, &ctrl_u));
        assert!(text.is_empty());

        assert!(!edit_text(&mut text, &key(KeyCode::Up)));
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut text = "a".to_string();
        paste_text(&mut text, "b\nc\r\n");
        assert_eq!(text, "ab c  ");
    }
}
