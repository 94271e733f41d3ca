//! TUI runner
//!
//! Sets up the terminal backend and drives the program from settings to
//! the main menu.

use anyhow::Result;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::stdout;

use crate::settings::SettingsStore;
use crate::ui::dialog::{CrosstermEvents, Dialog, TerminalDialog};
use crate::ui::flows::main_menu::perform_main_menu;
use crate::ui::flows::startup::{attach_or_start, load_or_ask_settings};
use crate::ui::{App, BASE_TITLE};

/// How a UI session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The user left through the main menu
    Exited,
    /// No settings were stored and the settings form was cancelled
    SettingsCancelled,
}

/// Run the full UI on the real terminal
pub fn run_tui(store: SettingsStore) -> Result<RunOutcome> {
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableBracketedPaste)?;

    // Ensure terminal is restored even if we exit early
    struct TuiGuard;
    impl Drop for TuiGuard {
        fn drop(&mut self) {
            let _ = disable_raw_mode();
            let mut out = std::io::stdout();
            let _ = execute!(out, DisableBracketedPaste, LeaveAlternateScreen);
        }
    }
    let _guard = TuiGuard;

    let terminal = Terminal::new(CrosstermBackend::new(out))?;
    let mut dialog = TerminalDialog::new(terminal, CrosstermEvents);
    run_app(&mut dialog, store)
}

/// Settings, daemon start, then the main menu until the user exits
pub fn run_app(dialog: &mut dyn Dialog, store: SettingsStore) -> Result<RunOutcome> {
    dialog.set_background_title(BASE_TITLE);

    let Some(settings) = load_or_ask_settings(dialog, &store)? else {
        tracing::info!("Settings form cancelled");
        return Ok(RunOutcome::SettingsCancelled);
    };

    let mut app = App::new(settings, store);
    attach_or_start(&mut app, dialog)?;
    perform_main_menu(&mut app, dialog)?;
    Ok(RunOutcome::Exited)
}
