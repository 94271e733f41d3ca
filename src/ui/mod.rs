//! Terminal user interface
//!
//! Holds the application state shared by the menu flows and the dialog
//! machinery they use.

use anyhow::{anyhow, Result};

use crate::serval::{short_id, ServalApi, ServalDaemon, ServalRestClient};
use crate::settings::{Settings, SettingsStore};

pub mod dialog;
pub mod flows;
pub mod layout;
pub mod render;
pub mod runner;
pub mod widgets;

/// Background title before an identity is known
pub const BASE_TITLE: &str = "serval-dna text ui";

/// Builds the daemon handle and REST client for a set of settings
pub type Connector = Box<dyn Fn(&Settings) -> (ServalDaemon, Box<dyn ServalApi>)>;

/// State shared by all flows
pub struct App {
    pub settings: Settings,
    pub store: SettingsStore,
    pub daemon: ServalDaemon,
    pub api: Box<dyn ServalApi>,
    /// Our own SID once the daemon is up
    pub my_sid: Option<String>,
    connector: Connector,
}

impl App {
    pub fn new(settings: Settings, store: SettingsStore) -> Self {
        Self::with_connector(settings, store, Box::new(connect))
    }

    pub fn with_connector(settings: Settings, store: SettingsStore, connector: Connector) -> Self {
        let (daemon, api) = connector(&settings);
        Self {
            settings,
            store,
            daemon,
            api,
            my_sid: None,
            connector,
        }
    }

    /// Switch to new settings, reconnecting daemon handle and REST client
    pub fn apply_settings(&mut self, settings: Settings) {
        let (daemon, api) = (self.connector)(&settings);
        self.daemon = daemon;
        self.api = api;
        self.settings = settings;
    }

    pub fn background_title(&self) -> String {
        match &self.my_sid {
            Some(sid) => format!("{} // {}", BASE_TITLE, short_id(sid)),
            None => BASE_TITLE.to_string(),
        }
    }

    /// Our SID, or an error when no identity is known yet
    pub fn require_sid(&self) -> Result<&str> {
        self.my_sid
            .as_deref()
            .ok_or_else(|| anyhow!("No local identity; start servald first"))
    }
}

fn connect(settings: &Settings) -> (ServalDaemon, Box<dyn ServalApi>) {
    (
        ServalDaemon::from_settings(settings),
        Box::new(ServalRestClient::from_settings(settings)),
    )
}
