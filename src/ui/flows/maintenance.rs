use anyhow::Result;

use crate::ui::dialog::Dialog;
use crate::ui::flows::startup::start_instance;
use crate::ui::flows::{choices, report_errors};
use crate::ui::App;

pub(crate) fn perform_maintenance_menu(app: &mut App, dialog: &mut dyn Dialog) -> Result<()> {
    let menu = choices(&[("1)", "Start"), ("2)", "Stop"), ("b)", "back")]);

    loop {
        let Some(tag) = dialog.menu("Maintenance:", &menu)? else {
            return Ok(());
        };
        let result = match tag.as_str() {
            "b)" => return Ok(()),
            "1)" => start_instance(app, dialog),
            "2)" => stop_instance(app, dialog),
            _ => Ok(()),
        };
        report_errors(dialog, result)?;
    }
}

fn stop_instance(app: &mut App, dialog: &mut dyn Dialog) -> Result<()> {
    if app.daemon.stop()? {
        dialog.msgbox("servald stopped")
    } else {
        dialog.msgbox("servald is not running")
    }
}
