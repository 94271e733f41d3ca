//! Runtime settings
//!
//! Settings live in the `[main]` section of `~/.sdnatuirc`, an INI file:
//!
//! ```text
//! [main]
//! instance_path = /tmp/serval
//! serval_binary = /usr/local/bin/servald
//! interface = *
//! rest_user = pum
//! rest_pass = pum123
//! ```
//!
//! `rest_url` is optional and defaults to the daemon's local REST port.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".sdnatuirc";
pub const MAIN_SECTION: &str = "main";
pub const DEFAULT_REST_URL: &str = "http://127.0.0.1:4110";
pub const DEFAULT_INSTANCE_PATH: &str = "/tmp/serval";

const REQUIRED_KEYS: [&str; 5] = [
    "instance_path",
    "serval_binary",
    "interface",
    "rest_user",
    "rest_pass",
];

/// One `[section]` of an INI file, entries kept in file order
#[derive(Debug, Clone, PartialEq, Eq)]
struct IniSection {
    name: String,
    entries: Vec<(String, String)>,
}

/// Minimal INI document that preserves section and key order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<IniSection>,
}

impl IniDocument {
    /// Parse INI text. Comments (`#`, `;`) and keys outside a section are dropped.
    pub fn parse(content: &str) -> Self {
        let mut doc = IniDocument::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                let name = line[1..line.len() - 1].trim().to_string();
                doc.sections.push(IniSection {
                    name,
                    entries: Vec::new(),
                });
                continue;
            }

            // Whichever delimiter comes first separates key and value
            let Some(split) = line.find(['=', ':']) else {
                continue;
            };
            let (key, value) = (&line[..split], &line[split + 1..]);
            if let Some(section) = doc.sections.last_mut() {
                section
                    .entries
                    .push((key.trim().to_string(), value.trim().to_string()));
            }
        }

        doc
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .filter(|s| s.name == section)
            .flat_map(|s| s.entries.iter())
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a value, creating the section if needed
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        let value = value.into();
        let index = match self.sections.iter().position(|s| s.name == section) {
            Some(index) => index,
            None => {
                self.sections.push(IniSection {
                    name: section.to_string(),
                    entries: Vec::new(),
                });
                self.sections.len() - 1
            }
        };

        let entries = &mut self.sections[index].entries;
        match entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => entries.push((key.to_string(), value)),
        }
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.iter().any(|s| s.name == section)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            out.push_str(&format!("[{}]\n", section.name));
            for (key, value) in &section.entries {
                out.push_str(&format!("{} = {}\n", key, value));
            }
            out.push('\n');
        }
        out
    }
}

/// Daemon location and REST credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Value for `SERVALINSTANCE_PATH`
    pub instance_path: PathBuf,
    /// Path to the `servald` executable
    pub serval_binary: PathBuf,
    /// Interface match pattern handed to the daemon
    pub interface: String,
    pub rest_user: String,
    pub rest_pass: String,
    /// Base URL of the REST API
    pub rest_url: String,
}

impl Settings {
    /// Values offered when no settings file exists yet
    pub fn defaults() -> Self {
        Self {
            instance_path: PathBuf::from(DEFAULT_INSTANCE_PATH),
            serval_binary: find_in_path("servald").unwrap_or_default(),
            interface: "*".to_string(),
            rest_user: "pum".to_string(),
            rest_pass: "pum123".to_string(),
            rest_url: DEFAULT_REST_URL.to_string(),
        }
    }

    /// Read the `[main]` section; `None` unless every required key is present.
    pub fn from_document(doc: &IniDocument) -> Option<Self> {
        if REQUIRED_KEYS
            .iter()
            .any(|key| doc.get(MAIN_SECTION, key).is_none())
        {
            return None;
        }
        let get = |key: &str| doc.get(MAIN_SECTION, key).unwrap_or_default().to_string();

        Some(Self {
            instance_path: PathBuf::from(get("instance_path")),
            serval_binary: PathBuf::from(get("serval_binary")),
            interface: get("interface"),
            rest_user: get("rest_user"),
            rest_pass: get("rest_pass"),
            rest_url: doc
                .get(MAIN_SECTION, "rest_url")
                .filter(|url| !url.is_empty())
                .unwrap_or(DEFAULT_REST_URL)
                .to_string(),
        })
    }

    pub fn apply_to(&self, doc: &mut IniDocument) {
        doc.set(
            MAIN_SECTION,
            "instance_path",
            self.instance_path.to_string_lossy(),
        );
        doc.set(
            MAIN_SECTION,
            "serval_binary",
            self.serval_binary.to_string_lossy(),
        );
        doc.set(MAIN_SECTION, "interface", self.interface.as_str());
        doc.set(MAIN_SECTION, "rest_user", self.rest_user.as_str());
        doc.set(MAIN_SECTION, "rest_pass", self.rest_pass.as_str());
        if self.rest_url != DEFAULT_REST_URL || doc.get(MAIN_SECTION, "rest_url").is_some() {
            doc.set(MAIN_SECTION, "rest_url", self.rest_url.as_str());
        }
    }
}

/// Location of the settings file
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `~/.sdnatuirc`
    pub fn in_home() -> Result<Self> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(Self::new(home.join(CONFIG_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<IniDocument> {
        if !self.path.exists() {
            return Ok(IniDocument::default());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings: {:?}", self.path))?;
        Ok(IniDocument::parse(&content))
    }

    /// Load complete settings, `Ok(None)` when the file or a required key is missing
    pub fn load(&self) -> Result<Option<Settings>> {
        Ok(Settings::from_document(&self.read_document()?))
    }

    /// Stored values where present, defaults for the rest (used to pre-fill the form)
    pub fn load_or_defaults(&self) -> Settings {
        let defaults = Settings::defaults();
        let Ok(doc) = self.read_document() else {
            return defaults;
        };
        let get = |key: &str, fallback: String| {
            doc.get(MAIN_SECTION, key)
                .map(str::to_string)
                .unwrap_or(fallback)
        };

        Settings {
            instance_path: PathBuf::from(get(
                "instance_path",
                defaults.instance_path.to_string_lossy().into_owned(),
            )),
            serval_binary: PathBuf::from(get(
                "serval_binary",
                defaults.serval_binary.to_string_lossy().into_owned(),
            )),
            interface: get("interface", defaults.interface),
            rest_user: get("rest_user", defaults.rest_user),
            rest_pass: get("rest_pass", defaults.rest_pass),
            rest_url: get("rest_url", defaults.rest_url),
        }
    }

    /// Write settings, keeping any other sections already in the file
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let mut doc = self.read_document()?;
        settings.apply_to(&mut doc);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory: {:?}", parent))?;
        }
        fs::write(&self.path, doc.render())
            .with_context(|| format!("Failed to write settings: {:?}", self.path))?;

        // The file holds the REST password
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)) {
                tracing::warn!("Could not restrict permissions on {:?}: {}", self.path, e);
            }
        }

        tracing::info!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

/// Find an executable on `PATH`
pub fn find_in_path(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}
