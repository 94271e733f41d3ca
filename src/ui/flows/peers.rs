use anyhow::Result;

use crate::ui::dialog::Dialog;
use crate::ui::App;

/// Show the peers currently reachable by the daemon
pub(crate) fn perform_show_peers(app: &mut App, dialog: &mut dyn Dialog) -> Result<()> {
    let peers = app.daemon.peers()?;
    tracing::info!("{} peer(s) reachable", peers.len());
    dialog.scrollbox(&peers.join("\n"), " Current Peers ")
}
