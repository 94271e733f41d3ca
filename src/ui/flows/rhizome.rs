//! Rhizome menu: list, share, export and view bundles

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::serval::{short_id, Bundle};
use crate::size::format_size;
use crate::ui::dialog::Dialog;
use crate::ui::flows::{choices, report_errors};
use crate::ui::widgets::MenuChoice;
use crate::ui::App;

/// Service name of plain shared files
pub const FILE_SERVICE: &str = "file";

fn short_opt(id: Option<&str>) -> String {
    short_id(id.unwrap_or(""))
}

/// `<service> <bid8>* <size> <sender8>* <recipient8>* <name>`
pub fn bundle_list_line(bundle: &Bundle) -> Result<String> {
    Ok(format!(
        "{} {} {} {} {} {}",
        bundle.service,
        short_id(&bundle.id),
        format_size(bundle.filesize)?,
        short_opt(bundle.sender.as_deref()),
        short_opt(bundle.recipient.as_deref()),
        bundle.name.as_deref().unwrap_or("")
    ))
}

/// `<bid8>* <service> <size> <sender8>* <recipient8>* <name>`
pub fn bundle_choice_line(bundle: &Bundle) -> Result<String> {
    Ok(format!(
        "{} {} {} {} {} {}",
        short_id(&bundle.id),
        bundle.service,
        format_size(bundle.filesize)?,
        short_opt(bundle.sender.as_deref()),
        short_opt(bundle.recipient.as_deref()),
        bundle.name.as_deref().unwrap_or("")
    ))
}

/// Bundles matching a user-entered service filter: empty means `file`, `*` anything
pub fn filter_bundles<'a>(bundles: &'a [Bundle], filter: &str) -> Vec<&'a Bundle> {
    let filter = if filter.is_empty() { FILE_SERVICE } else { filter };
    bundles
        .iter()
        .filter(|b| filter == "*" || b.service == filter)
        .collect()
}

pub(crate) fn perform_rhizome_menu(app: &mut App, dialog: &mut dyn Dialog) -> Result<()> {
    let menu = choices(&[
        ("f)", "List files"),
        ("l)", "List everything"),
        ("s)", "Share file"),
        ("e)", "Export file"),
        ("v)", "View file (valid utf-8 only!)"),
        ("b)", "back"),
    ]);

    loop {
        let Some(tag) = dialog.menu("Rhizome Actions:", &menu)? else {
            return Ok(());
        };
        let result = match tag.as_str() {
            "b)" => return Ok(()),
            "f)" => list_bundles(app, dialog, Some(FILE_SERVICE)),
            "l)" => list_bundles(app, dialog, None),
            "s)" => share_file(app, dialog),
            "e)" => export_file(app, dialog),
            "v)" => view_file(app, dialog),
            _ => Ok(()),
        };
        report_errors(dialog, result)?;
    }
}

fn list_bundles(app: &mut App, dialog: &mut dyn Dialog, service: Option<&str>) -> Result<()> {
    let bundles = app.api.rhizome_list()?;
    let mut output = String::new();
    for bundle in bundles
        .iter()
        .filter(|b| service.map_or(true, |s| b.service == s))
    {
        output.push_str(&bundle_list_line(bundle)?);
        output.push('\n');
    }
    dialog.scrollbox(&output, " Rhizome File List ")
}

/// Ask for a service filter and let the user pick one matching bundle
fn select_bundle(app: &mut App, dialog: &mut dyn Dialog, prompt: &str) -> Result<Option<Bundle>> {
    let Some(filter) = dialog.inputbox("Service filter (empty = file, * = any):", "")? else {
        return Ok(None);
    };
    let filter = filter.trim();

    let bundles = app.api.rhizome_list()?;
    let matching = filter_bundles(&bundles, filter);
    if matching.is_empty() {
        let shown = if filter.is_empty() { FILE_SERVICE } else { filter };
        dialog.msgbox(&format!("No files found matching service filter: {}", shown))?;
        return Ok(None);
    }

    let entries = matching
        .iter()
        .enumerate()
        .map(|(i, b)| -> Result<MenuChoice> {
            Ok(MenuChoice::new(i.to_string(), bundle_choice_line(b)?))
        })
        .collect::<Result<Vec<_>>>()?;

    let Some(tag) = dialog.menu(prompt, &entries)? else {
        return Ok(None);
    };
    Ok(tag
        .parse::<usize>()
        .ok()
        .and_then(|i| matching.get(i))
        .map(|b| (*b).clone()))
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn share_file(app: &mut App, dialog: &mut dyn Dialog) -> Result<()> {
    let sid = app.require_sid()?.to_string();
    let Some(path) = dialog.fselect(&current_dir())? else {
        return Ok(());
    };
    if !path.is_file() {
        return dialog.msgbox("Only sharing of files is allowed!");
    }

    tracing::info!("Sharing {:?} as {}", path, short_id(&sid));
    let output = app.daemon.rhizome_add_file(&sid, &path)?;
    dialog.msgbox(&output)
}

fn export_target(bundle: &Bundle) -> PathBuf {
    let name = bundle
        .name
        .as_deref()
        .and_then(|n| Path::new(n).file_name())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&bundle.id));
    current_dir().join(name)
}

fn export_file(app: &mut App, dialog: &mut dyn Dialog) -> Result<()> {
    let Some(bundle) = select_bundle(app, dialog, "Select file to export:")? else {
        return Ok(());
    };
    let initial = export_target(&bundle);
    let Some(target) = dialog.inputbox("Export to:", &initial.to_string_lossy())? else {
        return Ok(());
    };
    let target = PathBuf::from(target.trim());
    if target.exists() && !dialog.yesno(&format!("{} exists. Overwrite?", target.display()))? {
        return Ok(());
    }

    let payload = app.api.rhizome_raw(&bundle.id)?;
    fs::write(&target, &payload).with_context(|| format!("Failed to write {:?}", target))?;
    tracing::info!("Exported bundle {} to {:?}", short_id(&bundle.id), target);
    dialog.msgbox(&format!(
        "Exported {} to {}",
        format_size(payload.len() as u64)?,
        target.display()
    ))
}

fn view_file(app: &mut App, dialog: &mut dyn Dialog) -> Result<()> {
    let Some(bundle) = select_bundle(app, dialog, "Select file to view:")? else {
        return Ok(());
    };
    let payload = app.api.rhizome_raw(&bundle.id)?;
    match String::from_utf8(payload) {
        Ok(text) => {
            let title = bundle.name.clone().unwrap_or_else(|| short_id(&bundle.id));
            dialog.scrollbox(&text, &title)
        }
        Err(_) => dialog.msgbox("File is not valid UTF-8!"),
    }
}
