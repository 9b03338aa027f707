use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{input::InputConfig, math::Vec2};

const APP_DIR: &str = "horus";

fn default_screen_width() -> f32 {
    1280.0
}

fn default_screen_height() -> f32 {
    720.0
}

fn default_scroll_delay() -> i32 {
    crate::components::AUTO_SCROLL_DELAY
}

/// Frontend configuration, read from `config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontendConfig {
    #[serde(default = "default_screen_width")]
    pub screen_width: f32,
    #[serde(default = "default_screen_height")]
    pub screen_height: f32,
    /// Delay before the game details start scrolling, in ms.
    #[serde(default = "default_scroll_delay")]
    pub scroll_delay: i32,
    #[serde(default)]
    pub settings_path: Option<PathBuf>,
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    #[serde(default)]
    pub preload_gamelists: bool,
    /// Action name to button names, e.g. `a: [South]`.
    #[serde(default)]
    pub input: BTreeMap<String, Vec<String>>,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
            scroll_delay: default_scroll_delay(),
            settings_path: None,
            catalog_path: None,
            preload_gamelists: false,
            input: BTreeMap::new(),
        }
    }
}

impl FrontendConfig {
    /// `horus` under the platform config directory (`$XDG_CONFIG_HOME` on
    /// Linux), or `~/.horus` when there is none.
    pub fn config_dir() -> Option<PathBuf> {
        if let Some(dir) = dirs::config_dir() {
            Some(dir.join(APP_DIR))
        } else {
            dirs::home_dir().map(|home| home.join(format!(".{}", APP_DIR)))
        }
    }

    /// Reads `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_yaml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let raw = serde_yaml::to_string(self)?;
        fs::write(path, raw).with_context(|| format!("writing config {}", path.display()))
    }

    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    pub fn input_config(&self) -> Result<InputConfig> {
        InputConfig::from_names(&self.input)
    }

    /// Settings file, next to the config file unless set.
    pub fn settings_path(&self, config_dir: &Path) -> PathBuf {
        self.settings_path
            .clone()
            .unwrap_or_else(|| config_dir.join("es_settings.yaml"))
    }

    pub fn catalog_path(&self, config_dir: &Path) -> PathBuf {
        self.catalog_path
            .clone()
            .unwrap_or_else(|| config_dir.join("catalog.yaml"))
    }
}

#[cfg(test)]
mod tests {
    use gilrs::Button;

    use super::*;
    use crate::input::Input;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FrontendConfig::load(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, FrontendConfig::default());
        assert_eq!(config.screen_size(), Vec2::new(1280.0, 720.0));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "screen_width: 1920\ninput:\n  a: [East]\n").unwrap();

        let config = FrontendConfig::load(&path).unwrap();
        assert_eq!(config.screen_width, 1920.0);
        assert_eq!(config.screen_height, 720.0);
        assert_eq!(config.scroll_delay, 1000);

        let input = config.input_config().unwrap();
        assert!(input.is_mapped_to("a", &Input::pressed(Button::East)));
        assert!(input.is_mapped_to("b", &Input::pressed(Button::East)));
        assert!(!input.is_mapped_to("a", &Input::pressed(Button::South)));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let mut config = FrontendConfig::default();
        config.scroll_delay = 2500;
        config.preload_gamelists = true;
        config.save(&path).unwrap();
        assert_eq!(FrontendConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn bad_button_name_is_an_error() {
        let mut config = FrontendConfig::default();
        config.input.insert("a".to_owned(), vec!["Banana".to_owned()]);
        assert!(config.input_config().is_err());
    }

    #[test]
    fn config_dir_is_app_specific() {
        if let Some(dir) = FrontendConfig::config_dir() {
            let name = dir.file_name().and_then(|n| n.to_str()).unwrap();
            assert!(name == APP_DIR || name == ".horus");
        }
    }

    #[test]
    fn paths_default_to_config_dir() {
        let config = FrontendConfig::default();
        let dir = Path::new("/etc/horus");
        assert_eq!(config.settings_path(dir), dir.join("es_settings.yaml"));
        assert_eq!(config.catalog_path(dir), dir.join("catalog.yaml"));
    }
}
