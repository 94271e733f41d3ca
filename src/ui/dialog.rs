//! Modal dialogs in the style of dialog(1)
//!
//! Flows talk to the user only through [`Dialog`], so they can be driven by
//! the terminal implementation or by scripted fakes in tests.

use anyhow::{bail, Result};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ui::render::{render_modal, render_notice};
use crate::ui::widgets::{
    is_ctrl, FileSelect, Form, FormField, InputLine, KeyOutcome, MenuChoice, MenuList, Modal,
    TextBox, YesNo,
};

/// How long to wait for input before redrawing
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// User interaction used by the flows
pub trait Dialog {
    /// Text shown above every dialog
    fn set_background_title(&mut self, title: &str);

    /// Show a notice and return immediately
    fn infobox(&mut self, text: &str) -> Result<()>;

    /// Show a notice and wait for it to be dismissed
    fn msgbox(&mut self, text: &str) -> Result<()>;

    /// Show long text in a scrollable box
    fn scrollbox(&mut self, text: &str, title: &str) -> Result<()>;

    /// Ask for one line of text; `None` when cancelled
    fn inputbox(&mut self, prompt: &str, initial: &str) -> Result<Option<String>>;

    /// Let the user pick one choice; returns its tag, `None` when cancelled
    fn menu(&mut self, prompt: &str, choices: &[MenuChoice]) -> Result<Option<String>>;

    /// Ask a yes/no question; cancelling answers no
    fn yesno(&mut self, question: &str) -> Result<bool>;

    /// Edit several fields at once; `None` when cancelled
    fn form(&mut self, title: &str, fields: &[FormField]) -> Result<Option<Vec<String>>>;

    /// Browse for a file starting in `dir`; `None` when cancelled
    fn fselect(&mut self, dir: &Path) -> Result<Option<PathBuf>>;
}

/// Source of terminal events
pub trait EventSource {
    /// Next event, or `None` if nothing arrived within the poll interval
    fn next_event(&mut self) -> Result<Option<Event>>;
}

/// Events from the real terminal
#[derive(Debug, Default)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn next_event(&mut self) -> Result<Option<Event>> {
        if !event::poll(POLL_INTERVAL)? {
            return Ok(None);
        }
        Ok(Some(event::read()?))
    }
}

/// Pre-recorded events, for driving dialogs without a terminal
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    events: VecDeque<Event>,
}

impl ScriptedEvents {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self) -> Result<Option<Event>> {
        match self.events.pop_front() {
            Some(event) => Ok(Some(event)),
            None => bail!("Event script exhausted"),
        }
    }
}

/// [`Dialog`] drawn on a ratatui terminal
pub struct TerminalDialog<B: Backend, E: EventSource> {
    terminal: Terminal<B>,
    events: E,
    background_title: String,
}

impl<B: Backend, E: EventSource> TerminalDialog<B, E> {
    pub fn new(terminal: Terminal<B>, events: E) -> Self {
        Self {
            terminal,
            events,
            background_title: String::new(),
        }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    /// Run one modal widget until it submits or is cancelled.
    ///
    /// Ctrl+C cancels any dialog.
    pub fn run_modal<M: Modal>(&mut self, mut modal: M) -> Result<Option<M::Output>> {
        loop {
            let title = self.background_title.as_str();
            self.terminal.draw(|f| render_modal(f, title, &modal))?;

            let Some(event) = self.events.next_event()? else {
                continue;
            };

            match event {
                Event::Key(key) => {
                    if !matches!(key.kind, KeyEventKind::Press) {
                        continue;
                    }
                    if is_ctrl(&key, 'c') {
                        return Ok(None);
                    }
                    match modal.handle_key(key) {
                        KeyOutcome::Continue => {}
                        KeyOutcome::Submit(value) => return Ok(Some(value)),
                        KeyOutcome::Cancel => return Ok(None),
                    }
                }
                Event::Paste(text) => modal.handle_paste(&text),
                _ => {}
            }
        }
    }
}

impl<B: Backend, E: EventSource> Dialog for TerminalDialog<B, E> {
    fn set_background_title(&mut self, title: &str) {
        self.background_title = title.to_string();
    }

    fn infobox(&mut self, text: &str) -> Result<()> {
        let title = self.background_title.as_str();
        self.terminal.draw(|f| render_notice(f, title, text))?;
        Ok(())
    }

    fn msgbox(&mut self, text: &str) -> Result<()> {
        self.run_modal(TextBox::message(text))?;
        Ok(())
    }

    fn scrollbox(&mut self, text: &str, title: &str) -> Result<()> {
        self.run_modal(TextBox::scrollable(text, title))?;
        Ok(())
    }

    fn inputbox(&mut self, prompt: &str, initial: &str) -> Result<Option<String>> {
        self.run_modal(InputLine::new(prompt, initial))
    }

    fn menu(&mut self, prompt: &str, choices: &[MenuChoice]) -> Result<Option<String>> {
        self.run_modal(MenuList::new(prompt, choices.to_vec()))
    }

    fn yesno(&mut self, question: &str) -> Result<bool> {
        Ok(self.run_modal(YesNo::new(question))?.unwrap_or(false))
    }

    fn form(&mut self, title: &str, fields: &[FormField]) -> Result<Option<Vec<String>>> {
        self.run_modal(Form::new(title, fields.to_vec()))
    }

    fn fselect(&mut self, dir: &Path) -> Result<Option<PathBuf>> {
        self.run_modal(FileSelect::new(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn dialog(events: Vec<Event>) -> TerminalDialog<TestBackend, ScriptedEvents> {
        let terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        TerminalDialog::new(terminal, ScriptedEvents::new(events))
    }

    fn screen(dialog: &TerminalDialog<TestBackend, ScriptedEvents>) -> String {
        dialog
            .terminal()
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_menu_returns_tag() {
        let mut d = dialog(vec![press(KeyCode::Down), press(KeyCode::Enter)]);
        d.set_background_title("serval-dna text ui // 01234567*");
        let choices = [MenuChoice::new("1)", "Start"), MenuChoice::new("2)", "Stop")];
        let picked = d.menu("Maintenance", &choices).unwrap();
        assert_eq!(picked.as_deref(), Some("2)"));
        assert!(screen(&d).starts_with("serval-dna text ui // 01234567*"));
    }

    #[test]
    fn test_key_releases_are_ignored() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Down,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        let mut d = dialog(vec![release, press(KeyCode::Enter)]);
        let choices = [MenuChoice::new("1)", "Start"), MenuChoice::new("2)", "Stop")];
        assert_eq!(d.menu("Maintenance", &choices).unwrap().as_deref(), Some("1)"));
    }

    #[test]
    fn test_inputbox_with_paste() {
        let mut d = dialog(vec![Event::Paste("hello".into()), press(KeyCode::Enter)]);
        assert_eq!(
            d.inputbox("Message:", "").unwrap().as_deref(),
            Some("hello")
        );
        assert_eq!(d.events().remaining(), 0);
    }

    #[test]
    fn test_fselect_returns_chosen_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hi").unwrap();
        // Entries are "..", then notes.txt
        let mut d = dialog(vec![press(KeyCode::Down), press(KeyCode::Enter)]);
        assert_eq!(
            d.fselect(dir.path()).unwrap(),
            Some(dir.path().join("notes.txt"))
        );
        assert!(screen(&d).contains("notes.txt"));
    }

    #[test]
    fn test_ctrl_c_cancels() {
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let mut d = dialog(vec![ctrl_c]);
        assert_eq!(d.inputbox("Output file:", "/tmp").unwrap(), None);
    }

    #[test]
    fn test_yesno_escape_is_no() {
        let mut d = dialog(vec![press(KeyCode::Esc), press(KeyCode::Enter)]);
        assert!(!d.yesno("Save these settings?").unwrap());
        assert!(d.yesno("Save these settings?").unwrap());
    }

    #[test]
    fn test_form_and_msgbox() {
        let mut d = dialog(vec![
            press(KeyCode::Tab),
            press(KeyCode::Char('x')),
            press(KeyCode::Enter),
            press(KeyCode::Enter),
        ]);
        let fields = [FormField::new("a", "1"), FormField::new("b", "2")];
        assert_eq!(
            d.form("Settings", &fields).unwrap(),
            Some(vec!["1".to_string(), "2x".to_string()])
        );
        d.msgbox("Settings saved").unwrap();
    }

    #[test]
    fn test_infobox_does_not_consume_events() {
        let mut d = dialog(vec![]);
        d.infobox("Starting new serval instance...").unwrap();
        assert!(screen(&d).contains("Starting new serval instance..."));
    }

    #[test]
    fn test_exhausted_script_is_error() {
        let mut d = dialog(vec![]);
        assert!(d.msgbox("never answered").is_err());
    }
}
