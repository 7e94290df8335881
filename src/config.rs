use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::debug;

use crate::cli::ConfigCommand;

const SETTINGS_FILE_BASENAME: &str = "settings.json";

pub const API_KEY: &str = "api_key";

/// Flat string settings persisted as one JSON object.
pub type Settings = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn from_project_dirs() -> Result<Self> {
        let project_dirs = ProjectDirs::from("com", "Skylark95", "steamutils")
            .context("unable to resolve project directories")?;
        Ok(Self::new(
            project_dirs.config_dir().join(SETTINGS_FILE_BASENAME),
        ))
    }

    /// An explicit path wins over the per-user default.
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Ok(Self::new(path)),
            None => Self::from_project_dirs(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing settings file reads as an empty mapping.
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            debug!("no settings file at {:?}", self.path);
            return Ok(Settings::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read settings file at {:?}", self.path))?;
        let settings = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse settings file at {:?}", self.path))?;
        Ok(settings)
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create settings dir at {:?}", parent))?;
        }
        let encoded = serde_json::to_string(settings).context("failed to serialize settings")?;
        let mut file = fs::File::create(&self.path)
            .with_context(|| format!("failed to open settings file at {:?}", self.path))?;
        file.write_all(encoded.as_bytes())
            .with_context(|| format!("failed to write settings file at {:?}", self.path))?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut settings = self.load()?;
        settings.insert(key.to_string(), value.to_string());
        self.save(&settings)?;
        debug!("stored '{}' in {:?}", key, self.path);
        Ok(())
    }
}

pub fn handle_set_credential(key: &str, store: &SettingsStore) -> Result<()> {
    store.set(API_KEY, key)
}

pub fn handle_config(command: ConfigCommand, store: &SettingsStore) -> Result<()> {
    println!("{}", render_config(command, store)?);
    Ok(())
}

fn render_config(command: ConfigCommand, store: &SettingsStore) -> Result<String> {
    match command {
        ConfigCommand::Show => {
            let mut settings = store.load()?;
            if let Some(key) = settings.get_mut(API_KEY) {
                *key = mask(key);
            }
            serde_json::to_string_pretty(&settings)
                .context("failed to serialize settings for display")
        }
        ConfigCommand::Paths => Ok(format!("settings: {:?}", store.path())),
    }
}

fn mask(secret: &str) -> String {
    let len = secret.chars().count();
    if len <= 4 {
        return "*".repeat(len);
    }
    let tail: String = secret.chars().skip(len - 4).collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join("nested").join(SETTINGS_FILE_BASENAME))
    }

    #[test]
    fn explicit_path_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        let store = SettingsStore::open(Some(path.clone())).unwrap();
        assert_eq!(store.path(), path.as_path());
        handle_set_credential("KEY", &store).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.get(API_KEY).unwrap(), None);
    }

    #[test]
    fn credential_survives_a_new_store() {
        let dir = tempfile::tempdir().unwrap();
        handle_set_credential("0123ABCD", &store_in(&dir)).unwrap();

        let reopened = store_in(&dir);
        assert_eq!(reopened.get(API_KEY).unwrap().as_deref(), Some("0123ABCD"));
    }

    #[test]
    fn set_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set("theme", "dark").unwrap();
        store.set(API_KEY, "first").unwrap();
        store.set(API_KEY, "second").unwrap();

        let settings = store.load().unwrap();
        assert_eq!(settings.get("theme").map(String::as_str), Some("dark"));
        assert_eq!(settings.get(API_KEY).map(String::as_str), Some("second"));
    }

    #[test]
    fn rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_BASENAME);
        fs::write(&path, "not json").unwrap();
        assert!(SettingsStore::new(path).load().is_err());
    }

    #[test]
    fn show_masks_stored_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(render_config(ConfigCommand::Show, &store).unwrap(), "{}");

        store.set(API_KEY, "0123456789ABCDEF").unwrap();
        let shown = render_config(ConfigCommand::Show, &store).unwrap();
        let parsed: Settings = serde_json::from_str(&shown).unwrap();
        assert_eq!(parsed.get(API_KEY).map(String::as_str), Some("****CDEF"));
        assert!(!shown.contains("0123456789"));
    }

    #[test]
    fn paths_names_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(
            render_config(ConfigCommand::Paths, &store).unwrap(),
            format!("settings: {:?}", store.path())
        );
    }

    #[test]
    fn masks_all_but_last_four() {
        assert_eq!(mask("ABCDEFGH"), "****EFGH");
        assert_eq!(mask("abc"), "***");
    }
}
