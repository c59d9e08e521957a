use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::classification::ClassifierConfig;

/// User-facing overrides layered on top of [`ClassifierConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassifierSettings {
    pub confidence_threshold: f64,
    pub memory_enabled: bool,
    /// Skip the confirmation queue; suggested labels stand immediately.
    pub auto_accept_suggestions: bool,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: ClassifierConfig::default().confidence_threshold,
            memory_enabled: true,
            auto_accept_suggestions: false,
        }
    }
}

impl ClassifierSettings {
    pub fn apply_to(&self, config: &mut ClassifierConfig) {
        config.confidence_threshold = self.confidence_threshold.clamp(0.0, 1.0);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserSettings {
    #[serde(default)]
    classifier: ClassifierSettings,
}

/// JSON-file backed settings. A missing or unreadable file yields defaults;
/// the file is only written on update.
pub struct SettingsStore {
    path: Option<PathBuf>,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path: Some(path),
            data: RwLock::new(data),
        })
    }

    /// Settings that live only as long as the store.
    pub fn ephemeral() -> Self {
        Self {
            path: None,
            data: RwLock::new(UserSettings::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, UserSettings>> {
        self.data
            .read()
            .map_err(|_| anyhow!("settings lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, UserSettings>> {
        self.data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))
    }

    pub fn classifier(&self) -> ClassifierSettings {
        match self.data.read() {
            Ok(guard) => guard.classifier.clone(),
            Err(poisoned) => poisoned.into_inner().classifier.clone(),
        }
    }

    pub fn update_classifier(&self, settings: ClassifierSettings) -> Result<()> {
        let mut guard = self.write()?;
        guard.classifier = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write settings to {}", path.display()))
    }

    pub fn reload(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let data: UserSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        *self.write()? = data;
        Ok(())
    }

    /// Serialized form of the current settings, as written to disk.
    pub fn to_json(&self) -> Result<String> {
        let guard = self.read()?;
        Ok(serde_json::to_string_pretty(&*guard)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("screenplay-paste-{}-{name}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn missing_file_gives_defaults() {
        let store = SettingsStore::new(temp_path("missing.json")).unwrap();
        assert_eq!(store.classifier(), ClassifierSettings::default());
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let path = temp_path("corrupt.json");
        fs::write(&path, "{ not json").unwrap();
        let store = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(store.classifier(), ClassifierSettings::default());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn updates_persist_and_reload() {
        let path = temp_path("roundtrip.json");
        let store = SettingsStore::new(path.clone()).unwrap();
        let updated = ClassifierSettings {
            confidence_threshold: 0.5,
            memory_enabled: false,
            auto_accept_suggestions: true,
        };
        store.update_classifier(updated.clone()).unwrap();

        let reopened = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(reopened.classifier(), updated);
        assert!(reopened.to_json().unwrap().contains("autoAcceptSuggestions"));

        fs::write(&path, r#"{"classifier":{"memoryEnabled":true}}"#).unwrap();
        reopened.reload().unwrap();
        let partial = reopened.classifier();
        assert!(partial.memory_enabled);
        assert_eq!(partial.confidence_threshold, 0.65);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn threshold_is_clamped_into_config() {
        let mut config = ClassifierConfig::default();
        ClassifierSettings {
            confidence_threshold: 3.0,
            ..ClassifierSettings::default()
        }
        .apply_to(&mut config);
        assert_eq!(config.confidence_threshold, 1.0);
    }
}
