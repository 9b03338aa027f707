use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Metadata for games, read from the local catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMetadata {
    /// Title of the game.
    pub title: String,
    /// Description of the game.
    #[serde(default)]
    pub desc: Option<String>,
    /// Genres of the game, can be multiple.
    #[serde(default)]
    pub genres: Vec<String>,
    /// Release date.
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub developers: Vec<String>,
    #[serde(default)]
    pub publishers: Vec<String>,
    /// Fav.
    #[serde(default)]
    pub favorite: bool,
}

impl GameMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            desc: None,
            genres: Vec::new(),
            release_date: None,
            developers: Vec::new(),
            publishers: Vec::new(),
            favorite: false,
        }
    }

    /// Detail text shown next to the game list.
    pub fn detail_text(&self) -> String {
        let mut lines = Vec::new();
        if let Some(date) = self.release_date {
            lines.push(format!("RELEASED: {}", date.format("%Y-%m-%d")));
        }
        if !self.developers.is_empty() {
            lines.push(format!("DEVELOPER: {}", self.developers.join(", ")));
        }
        if !self.publishers.is_empty() {
            lines.push(format!("PUBLISHER: {}", self.publishers.join(", ")));
        }
        if !self.genres.is_empty() {
            lines.push(format!("GENRE: {}", self.genres.join(", ")));
        }
        if let Some(ref desc) = self.desc {
            lines.push(String::new());
            lines.push(desc.clone());
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_text_includes_known_fields() {
        let mut game = GameMetadata::new("Sonic");
        game.release_date = NaiveDate::from_ymd_opt(1991, 6, 23);
        game.developers.push("Sonic Team".to_owned());
        game.desc = Some("Fast.".to_owned());
        let text = game.detail_text();
        assert!(text.starts_with("RELEASED: 1991-06-23"));
        assert!(text.contains("DEVELOPER: Sonic Team"));
        assert!(text.ends_with("Fast."));
        assert!(!text.contains("PUBLISHER"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let game: GameMetadata =
            serde_yaml::from_str("title: Tetris\nrelease_date: 1989-06-14\n").unwrap();
        assert_eq!(game.title, "Tetris");
        assert_eq!(game.release_date, NaiveDate::from_ymd_opt(1989, 6, 14));
        assert!(game.genres.is_empty());
        assert!(!game.favorite);
    }
}
