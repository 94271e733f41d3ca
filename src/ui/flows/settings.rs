use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::settings::{Settings, SettingsStore};
use crate::ui::dialog::Dialog;
use crate::ui::widgets::FormField;

const FORM_TITLE: &str = "Serval Runtime Config";

fn fields(current: &Settings) -> Vec<FormField> {
    vec![
        FormField::new("instance path", current.instance_path.to_string_lossy()),
        FormField::new("servald binary", current.serval_binary.to_string_lossy()),
        FormField::new("network interface", current.interface.as_str()),
        FormField::new("rest user", current.rest_user.as_str()),
        FormField::new("rest pass", current.rest_pass.as_str()),
    ]
}

/// Edit the settings in a form and save them after confirmation.
///
/// Returns the saved settings, or `None` when the form was cancelled or the
/// save declined.
pub(crate) fn perform_settings_form(
    dialog: &mut dyn Dialog,
    current: &Settings,
    store: &SettingsStore,
) -> Result<Option<Settings>> {
    let Some(values) = dialog.form(FORM_TITLE, &fields(current))? else {
        return Ok(None);
    };
    let [instance_path, serval_binary, interface, rest_user, rest_pass] = values.as_slice() else {
        bail!("Settings form returned {} values", values.len());
    };

    let settings = Settings {
        instance_path: PathBuf::from(instance_path.trim()),
        serval_binary: PathBuf::from(serval_binary.trim()),
        interface: interface.trim().to_string(),
        rest_user: rest_user.trim().to_string(),
        rest_pass: rest_pass.trim().to_string(),
        rest_url: current.rest_url.clone(),
    };

    if !dialog.yesno("Save these settings?")? {
        return Ok(None);
    }
    store.save(&settings)?;
    Ok(Some(settings))
}
