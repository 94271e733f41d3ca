//! Settings, daemon start and identity at program start

use anyhow::Result;

use crate::serval::short_id;
use crate::settings::{Settings, SettingsStore};
use crate::ui::dialog::Dialog;
use crate::ui::flows::settings::perform_settings_form;
use crate::ui::App;

/// Stored settings, or the settings form when they are missing or incomplete.
///
/// `None` means the user cancelled the form.
pub(crate) fn load_or_ask_settings(
    dialog: &mut dyn Dialog,
    store: &SettingsStore,
) -> Result<Option<Settings>> {
    if let Some(settings) = store.load()? {
        return Ok(Some(settings));
    }
    tracing::info!("No complete settings in {:?}", store.path());
    perform_settings_form(dialog, &store.load_or_defaults(), store)
}

/// Attach to a running daemon or start one, then log the unlocked identities
pub(crate) fn attach_or_start(app: &mut App, dialog: &mut dyn Dialog) -> Result<()> {
    if app.daemon.is_running() {
        dialog.msgbox("Using already running serval instance...")?;
        app.my_sid = app.daemon.self_sid()?;
        dialog.set_background_title(&app.background_title());
    } else {
        dialog.infobox("Starting new serval instance...")?;
        start_instance(app, dialog)?;
    }

    match app.api.identities() {
        Ok(identities) => {
            for identity in identities {
                tracing::info!(
                    "Identity {} did={} name={}",
                    identity.sid,
                    identity.did.as_deref().unwrap_or("-"),
                    identity.name.as_deref().unwrap_or("-")
                );
            }
        }
        Err(e) => tracing::warn!("Could not list identities: {:#}", e),
    }
    Ok(())
}

/// Start the daemon and make sure it has an identity
pub(crate) fn start_instance(app: &mut App, dialog: &mut dyn Dialog) -> Result<()> {
    app.daemon.start()?;

    let sid = match app.daemon.self_sid()? {
        Some(sid) => sid,
        None => {
            dialog.msgbox("creating new identity")?;
            let (sid, _) = app.daemon.ensure_identity()?;
            dialog.msgbox(&sid)?;
            sid
        }
    };

    tracing::info!("Running as {}", short_id(&sid));
    app.my_sid = Some(sid);
    dialog.set_background_title(&app.background_title());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::flows::testing::{Answer, FakeDialog};
    use tempfile::tempdir;

    #[test]
    fn test_complete_settings_skip_form() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join(".sdnatuirc"));
        store.save(&Settings::defaults()).unwrap();

        let mut dialog = FakeDialog::default();
        let settings = load_or_ask_settings(&mut dialog, &store).unwrap();
        assert_eq!(settings, Some(Settings::defaults()));
    }

    #[test]
    fn test_missing_settings_cancelled() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join(".sdnatuirc"));
        let mut dialog = FakeDialog::new(vec![Answer::Form(None)]);
        assert_eq!(load_or_ask_settings(&mut dialog, &store).unwrap(), None);
        assert!(dialog.finished());
    }
}
