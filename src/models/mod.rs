use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, rc::Rc};

mod game_metadata;

pub use self::game_metadata::GameMetadata;

pub type SystemId = String;

/// A game system (or collection) and the games it holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemData {
    /// Short name, unique across the catalog.
    pub name: SystemId,
    pub full_name: String,
    #[serde(default)]
    pub is_collection: bool,
    #[serde(default)]
    pub games: Vec<GameMetadata>,
}

impl SystemData {
    pub fn new(name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            is_collection: false,
            games: Vec::new(),
        }
    }

    pub fn is_game_system(&self) -> bool {
        !self.is_collection
    }
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    systems: Vec<SystemData>,
}

/// Reads the system/game catalog. Systems without games are dropped.
pub fn load_catalog(path: &Path) -> Result<Vec<Rc<SystemData>>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    parse_catalog(&raw).with_context(|| format!("parsing catalog {}", path.display()))
}

pub fn parse_catalog(raw: &str) -> Result<Vec<Rc<SystemData>>> {
    let file: CatalogFile = serde_yaml::from_str(raw)?;
    let systems = file
        .systems
        .into_iter()
        .filter(|s| {
            if s.games.is_empty() {
                log::warn!("system {} has no games, skipping", s.name);
            }
            !s.games.is_empty()
        })
        .map(Rc::new)
        .collect();
    Ok(systems)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
systems:
  - name: nes
    full_name: Nintendo Entertainment System
    games:
      - title: Metroid
      - title: Zelda
  - name: empty
    full_name: Nothing Here
  - name: favorites
    full_name: Favorites
    is_collection: true
    games:
      - title: Metroid
"#;

    #[test]
    fn parses_and_skips_empty_systems() {
        let systems = parse_catalog(CATALOG).unwrap();
        assert_eq!(systems.len(), 2);
        assert_eq!(systems[0].name, "nes");
        assert_eq!(systems[0].games.len(), 2);
        assert!(systems[0].is_game_system());
        assert!(!systems[1].is_game_system());
    }

    #[test]
    fn missing_catalog_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_catalog(&dir.path().join("nope.yaml")).is_err());
    }
}
