use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::preferences::{default_document, Preferences};

/// What `try_load` found on disk and what it had to change.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub preferences: Preferences,
    /// The file did not exist and was written with the default record.
    pub created: bool,
    /// Default keys that were missing from the file.
    pub filled: Vec<String>,
    /// Keys whose stored value could not be read and was reset to the default.
    pub repaired: Vec<String>,
    /// Set when the healed record could not be written back. The preferences
    /// above are still the ones read from disk.
    pub write_error: Option<String>,
}

impl LoadReport {
    /// The file on disk differs from `preferences` and has to be rewritten.
    pub fn needs_write(&self) -> bool {
        self.created || !self.filled.is_empty() || !self.repaired.is_empty()
    }
}

/// Reads and writes the preferences document at a fixed path.
///
/// Access is single-threaded (the GTK main loop), so there is no locking.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PreferenceStore { path: path.into() }
    }

    /// Store at the platform config dir, e.g. `~/.config/chatwrap/settings.json`.
    pub fn default_location() -> Result<Self, String> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| "Cannot determine config directory".to_string())?;
        Ok(Self::new(config_dir.join("chatwrap").join("settings.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences, falling back to defaults if the file is unreadable.
    ///
    /// A corrupt file is left on disk untouched; it is only replaced once
    /// the user changes a preference.
    pub fn load(&self) -> Preferences {
        match self.try_load() {
            Ok(report) => {
                if let Some(e) = &report.write_error {
                    log::error!("Error saving settings: {}", e);
                }
                if report.created {
                    log::info!("Created default settings at {:?}", self.path);
                }
                if !report.filled.is_empty() {
                    log::info!("Added missing settings keys: {}", report.filled.join(", "));
                }
                if !report.repaired.is_empty() {
                    log::warn!(
                        "Reset invalid settings values: {}",
                        report.repaired.join(", ")
                    );
                }
                report.preferences
            }
            Err(e) => {
                log::error!("Error reading settings: {}", e);
                Preferences::default()
            }
        }
    }

    pub fn try_load(&self) -> Result<LoadReport, String> {
        if !self.path.exists() {
            let preferences = Preferences::default();
            let write_error = self.try_save(&preferences).err();
            return Ok(LoadReport {
                preferences,
                created: true,
                filled: Vec::new(),
                repaired: Vec::new(),
                write_error,
            });
        }

        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read {:?}: {}", self.path, e))?;
        let mut document = match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(format!("{:?} does not contain a JSON object", self.path)),
            Err(e) => return Err(format!("Failed to parse {:?}: {}", self.path, e)),
        };

        let filled = fill_missing(&mut document);
        let repaired = repair_invalid(&mut document);

        let preferences: Preferences = serde_json::from_value(Value::Object(document))
            .map_err(|e| format!("Failed to decode settings: {}", e))?;

        let mut report = LoadReport {
            preferences,
            created: false,
            filled,
            repaired,
            write_error: None,
        };
        if report.needs_write() {
            report.write_error = self.try_save(&report.preferences).err();
        }
        Ok(report)
    }

    /// Persist preferences, logging rather than returning any failure.
    pub fn save(&self, preferences: &Preferences) {
        if let Err(e) = self.try_save(preferences) {
            log::error!("Error saving settings: {}", e);
        }
    }

    pub fn try_save(&self, preferences: &Preferences) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create settings directory: {}", e))?;
        }
        let json = serde_json::to_string_pretty(preferences)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;
        std::fs::write(&self.path, json)
            .map_err(|e| format!("Failed to write {:?}: {}", self.path, e))
    }

    /// Apply `change` to a copy of `current`, persist it and return it.
    pub fn update<F>(&self, current: &Preferences, change: F) -> Preferences
    where
        F: FnOnce(&mut Preferences),
    {
        let mut next = current.clone();
        change(&mut next);
        self.save(&next);
        next
    }
}

/// Insert every default key absent from `document`. Existing keys, known
/// or not, are left alone.
fn fill_missing(document: &mut Map<String, Value>) -> Vec<String> {
    let mut filled = Vec::new();
    for (key, value) in default_document() {
        if !document.contains_key(&key) {
            document.insert(key.clone(), value);
            filled.push(key);
        }
    }
    filled
}

/// Reset known keys whose value does not decode as the typed field.
///
/// Each key is checked against an otherwise-default record, so one bad
/// value never masks another.
fn repair_invalid(document: &mut Map<String, Value>) -> Vec<String> {
    let defaults = default_document();
    let mut repaired = Vec::new();
    for (key, default_value) in &defaults {
        let Some(current) = document.get(key) else {
            continue;
        };
        let mut probe = defaults.clone();
        probe.insert(key.clone(), current.clone());
        if serde_json::from_value::<Preferences>(Value::Object(probe)).is_err() {
            document.insert(key.clone(), default_value.clone());
            repaired.push(key.clone());
        }
    }
    repaired
}
