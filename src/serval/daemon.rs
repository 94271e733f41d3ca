//! servald lifecycle and CLI queries

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::time::Duration;

use crate::serval::process::ServalRunner;
use crate::settings::Settings;

/// Timeout applied to every servald invocation
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Control of one servald instance through its CLI
#[derive(Debug, Clone)]
pub struct ServalDaemon {
    runner: ServalRunner,
    interface: String,
    rest_user: String,
    rest_pass: String,
}

impl ServalDaemon {
    pub fn new(
        runner: ServalRunner,
        interface: impl Into<String>,
        rest_user: impl Into<String>,
        rest_pass: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            interface: interface.into(),
            rest_user: rest_user.into(),
            rest_pass: rest_pass.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let runner = ServalRunner::new(&settings.serval_binary)
            .with_instance(&settings.instance_path)
            .with_timeout(COMMAND_TIMEOUT);
        Self::new(
            runner,
            settings.interface.as_str(),
            settings.rest_user.as_str(),
            settings.rest_pass.as_str(),
        )
    }

    pub fn runner(&self) -> &ServalRunner {
        &self.runner
    }

    /// Whether the daemon for this instance is up (`servald status`)
    pub fn is_running(&self) -> bool {
        match self.runner.run(&["status"]) {
            Ok(output) => output
                .stdout
                .iter()
                .any(|line| line.trim() == "status:running"),
            Err(e) => {
                tracing::warn!("servald status failed: {:#}", e);
                false
            }
        }
    }

    /// Start the daemon and push interface and REST user configuration to it
    pub fn start(&self) -> Result<()> {
        if self.is_running() {
            bail!("servald is already running!");
        }

        tracing::info!(
            "Starting servald (instance {:?})",
            self.runner.instance_path()
        );
        let status = self.runner.run_quiet(&["start"])?;
        if !status.success() {
            bail!("servald start failed ({})", status);
        }

        self.config_set("interfaces.0.match", &self.interface)?;
        let user_key = format!("api.restful.users.{}.password", self.rest_user);
        self.config_set(&user_key, &self.rest_pass)?;
        Ok(())
    }

    /// Stop the daemon; returns whether it was running
    pub fn stop(&self) -> Result<bool> {
        if !self.is_running() {
            return Ok(false);
        }
        tracing::info!("Stopping servald");
        self.runner.run_checked(&["stop"])?;
        Ok(true)
    }

    fn config_set(&self, key: &str, value: &str) -> Result<()> {
        self.runner
            .run_checked(&["config", "set", key, value])
            .with_context(|| format!("Failed to set {}", key))?;
        Ok(())
    }

    /// SID of the first unlocked identity, if any
    pub fn self_sid(&self) -> Result<Option<String>> {
        let output = self.runner.run(&["id", "self"])?;
        if !output.success() {
            tracing::warn!("servald id self failed: {}", output.stderr_string());
            return Ok(None);
        }
        Ok(output.table_values().into_iter().next())
    }

    /// Return the own SID, creating an identity (and restarting) when there is none.
    ///
    /// The flag is true when a new identity was created.
    pub fn ensure_identity(&self) -> Result<(String, bool)> {
        if let Some(sid) = self.self_sid()? {
            return Ok((sid, false));
        }

        tracing::info!("No identity found, creating one");
        self.runner
            .run_checked(&["keyring", "add"])
            .context("Failed to add keyring identity")?;
        self.stop()?;
        self.start()?;

        match self.self_sid()? {
            Some(sid) => Ok((sid, true)),
            None => bail!("Could not create identity!"),
        }
    }

    /// Currently reachable peers
    pub fn peers(&self) -> Result<Vec<String>> {
        Ok(self.runner.run_checked(&["id", "peers"])?.table_values())
    }

    /// Every peer the daemon knows about
    pub fn all_peers(&self) -> Result<Vec<String>> {
        Ok(self.runner.run_checked(&["id", "allpeers"])?.table_values())
    }

    /// Share a file into rhizome, authored by `author_sid`
    pub fn rhizome_add_file(&self, author_sid: &str, path: &Path) -> Result<String> {
        let path = path.to_string_lossy();
        let output = self
            .runner
            .run_checked(&["rhizome", "add", "file", author_sid, path.as_ref()])?;
        Ok(output.stdout_string())
    }
}
