use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    cell::RefCell,
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

pub const RANDOM_MAX_ITEMS: &str = "RandomCollectionMaxItems";
pub const RANDOM_EXCLUSION_COLLECTION: &str = "RandomCollectionExclusionCollection";
pub const RANDOM_SYSTEMS: &str = "RandomCollectionSystems";
pub const RANDOM_SYSTEMS_AUTO: &str = "RandomCollectionSystemsAuto";
pub const RANDOM_SYSTEMS_CUSTOM: &str = "RandomCollectionSystemsCustom";

/// Handle passed to every component that reads or writes preferences.
pub type SharedSettings = Rc<RefCell<Settings>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    strings: BTreeMap<String, String>,
    #[serde(default)]
    maps: BTreeMap<String, BTreeMap<String, i32>>,
}

/// String-keyed user preferences persisted as YAML.
#[derive(Debug, Default)]
pub struct Settings {
    path: Option<PathBuf>,
    values: SettingsFile,
    dirty: bool,
}

impl Settings {
    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the store from `path`. A missing file yields an empty store that
    /// will be created on the first save.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("reading settings from {}", path.display()))?;
            serde_yaml::from_str(&raw)
                .with_context(|| format!("parsing settings in {}", path.display()))?
        } else {
            log::info!("no settings at {}, using defaults", path.display());
            SettingsFile::default()
        };
        Ok(Self {
            path: Some(path),
            values,
            dirty: false,
        })
    }

    pub fn shared(self) -> SharedSettings {
        Rc::new(RefCell::new(self))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Missing keys read as the empty string.
    pub fn get_string(&self, key: &str) -> String {
        self.values.strings.get(key).cloned().unwrap_or_default()
    }

    pub fn set_string(&mut self, key: &str, value: &str) {
        let previous = self.values.strings.insert(key.to_owned(), value.to_owned());
        if previous.as_deref() != Some(value) {
            self.dirty = true;
        }
    }

    /// Missing keys read as an empty map.
    pub fn get_map(&self, key: &str) -> BTreeMap<String, i32> {
        self.values.maps.get(key).cloned().unwrap_or_default()
    }

    pub fn set_map(&mut self, key: &str, value: BTreeMap<String, i32>) {
        if self.values.maps.get(key) != Some(&value) {
            self.dirty = true;
        }
        self.values.maps.insert(key.to_owned(), value);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn save_file(&mut self) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            log::debug!("in-memory settings, skipping save");
            self.dirty = false;
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let raw = serde_yaml::to_string(&self.values)?;
        fs::write(path, raw).with_context(|| format!("writing settings to {}", path.display()))?;
        log::info!("saved settings to {}", path.display());
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_have_empty_defaults() {
        let settings = Settings::in_memory();
        assert_eq!(settings.get_string(RANDOM_MAX_ITEMS), "");
        assert!(settings.get_map(RANDOM_SYSTEMS).is_empty());
    }

    #[test]
    fn setters_mark_dirty_only_on_change() {
        let mut settings = Settings::in_memory();
        settings.set_string(RANDOM_MAX_ITEMS, "10");
        assert!(settings.is_dirty());
        settings.save_file().unwrap();
        assert!(!settings.is_dirty());

        settings.set_string(RANDOM_MAX_ITEMS, "10");
        assert!(!settings.is_dirty());

        let mut map = BTreeMap::new();
        map.insert("NES".to_owned(), 3);
        settings.set_map(RANDOM_SYSTEMS, map.clone());
        assert!(settings.is_dirty());
        settings.save_file().unwrap();
        settings.set_map(RANDOM_SYSTEMS, map);
        assert!(!settings.is_dirty());
    }

    #[test]
    fn persists_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.yaml");

        let mut settings = Settings::load(&path).unwrap();
        settings.set_string(RANDOM_EXCLUSION_COLLECTION, "favorites");
        let mut map = BTreeMap::new();
        map.insert("SNES".to_owned(), 2);
        settings.set_map(RANDOM_SYSTEMS_AUTO, map);
        settings.save_file().unwrap();

        let reloaded = Settings::load(&path).unwrap();
        assert_eq!(reloaded.get_string(RANDOM_EXCLUSION_COLLECTION), "favorites");
        assert_eq!(reloaded.get_map(RANDOM_SYSTEMS_AUTO).get("SNES"), Some(&2));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        fs::write(&path, "strings: [not, a, map]").unwrap();
        assert!(Settings::load(&path).is_err());
    }
}
