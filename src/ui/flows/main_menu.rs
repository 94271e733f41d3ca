use anyhow::Result;

use crate::ui::dialog::Dialog;
use crate::ui::flows::meshms::perform_meshms_menu;
use crate::ui::flows::peers::perform_show_peers;
use crate::ui::flows::rhizome::perform_rhizome_menu;
use crate::ui::flows::settings::perform_settings_form;
use crate::ui::flows::{choices, maintenance::perform_maintenance_menu, report_errors};
use crate::ui::App;

/// Run the main menu until the user exits
pub(crate) fn perform_main_menu(app: &mut App, dialog: &mut dyn Dialog) -> Result<()> {
    let menu = choices(&[
        ("1)", "Show peers"),
        ("2)", "Rhizome"),
        ("3)", "MeshMS"),
        ("M)", "Maintenance"),
        ("s)", "Settings"),
        ("q)", "Exit"),
    ]);

    loop {
        let result = match dialog.menu("Main Menu", &menu)?.as_deref() {
            Some("1)") => perform_show_peers(app, dialog),
            Some("2)") => perform_rhizome_menu(app, dialog),
            Some("3)") => perform_meshms_menu(app, dialog),
            Some("M)") => perform_maintenance_menu(app, dialog),
            Some("s)") => change_settings(app, dialog),
            Some("q)") | None => return exit(app, dialog),
            Some(_) => Ok(()),
        };
        report_errors(dialog, result)?;
    }
}

fn change_settings(app: &mut App, dialog: &mut dyn Dialog) -> Result<()> {
    let current = app.settings.clone();
    if let Some(settings) = perform_settings_form(dialog, &current, &app.store)? {
        app.apply_settings(settings);
    }
    Ok(())
}

fn exit(app: &mut App, dialog: &mut dyn Dialog) -> Result<()> {
    if app.daemon.is_running() && dialog.yesno("Stop running serval instance before exiting?")? {
        app.daemon.stop()?;
    }
    Ok(())
}
