use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{BingoError, Result};

/// A show as delivered by the show data service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub id: String,
    pub show_title: String,
    #[serde(default)]
    pub game_title: Option<String>,
    #[serde(default)]
    pub center_square: Option<String>,
    #[serde(default)]
    pub phrases: Vec<String>,
}

impl Show {
    /// Title shown above the card: the game title if set, else the show title.
    pub fn display_title(&self) -> &str {
        self.game_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.show_title)
    }

    /// Snapshot of this show's phrases as a pool.
    pub fn phrase_pool(&self) -> PhrasePool {
        PhrasePool::new(self.phrases.clone())
    }

    pub fn center_label(&self) -> Option<&str> {
        self.center_square.as_deref()
    }
}

/// Ordered, distinct phrases a card is sampled from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhrasePool {
    phrases: Vec<String>,
}

impl PhrasePool {
    /// Build a pool, trimming entries and dropping blanks and repeats.
    ///
    /// First-seen order is kept.
    pub fn new(raw: Vec<String>) -> Self {
        let total = raw.len();
        let mut seen = HashSet::with_capacity(total);
        let phrases: Vec<String> = raw
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .filter(|p| seen.insert(p.clone()))
            .collect();

        let dropped = total - phrases.len();
        if dropped > 0 {
            tracing::warn!(dropped, kept = phrases.len(), "dropped blank or duplicate phrases");
        }
        Self { phrases }
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.phrases
    }
}

impl<S: Into<String>> FromIterator<S> for PhrasePool {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Read access to shows by identifier.
pub trait ShowSource {
    fn show(&self, id: &str) -> Result<Show>;
}

// The JSON file has the following structure:
// {
//    "shows": [ { "id": "...", "showTitle": "...", "phrases": [ ... ] }, ... ]
// }
#[derive(Debug, Deserialize)]
struct ShowsWrapper {
    shows: Vec<Show>,
}

/// Shows loaded from a JSON file.
#[derive(Debug, Clone, Default)]
pub struct JsonShowStore {
    shows: Vec<Show>,
}

impl JsonShowStore {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let wrapper: ShowsWrapper = serde_json::from_reader(reader)?;
        tracing::debug!(path = %path.display(), shows = wrapper.shows.len(), "loaded show store");
        Ok(Self {
            shows: wrapper.shows,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let wrapper: ShowsWrapper = serde_json::from_str(json)?;
        Ok(Self {
            shows: wrapper.shows,
        })
    }

    pub fn list(&self) -> &[Show] {
        &self.shows
    }
}

impl ShowSource for JsonShowStore {
    fn show(&self, id: &str) -> Result<Show> {
        self.shows
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| BingoError::ShowNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const STORE: &str = r#"{
        "shows": [
            { "id": "bake-off", "showTitle": "Bake Off", "gameTitle": "Soggy Bottoms",
              "centerSquare": "Handshake", "phrases": ["Soggy bottom", "Proved", "Crumb"] },
            { "id": "quiz", "showTitle": "Quiz Night" }
        ]
    }"#;

    #[test]
    fn pool_trims_and_dedupes_in_order() {
        let pool: PhrasePool = ["  a ", "b", "", "a", "   ", "c", "b"].into_iter().collect();
        assert_eq!(pool.as_slice(), ["a", "b", "c"]);
    }

    #[test]
    fn optional_fields_default() {
        let store = JsonShowStore::from_json(STORE).expect("parse");
        let quiz = store.show("quiz").expect("quiz");
        assert!(quiz.phrases.is_empty());
        assert_eq!(quiz.center_label(), None);
        assert_eq!(quiz.display_title(), "Quiz Night");
    }

    #[test]
    fn game_title_wins_when_present() {
        let store = JsonShowStore::from_json(STORE).expect("parse");
        let show = store.show("bake-off").expect("show");
        assert_eq!(show.display_title(), "Soggy Bottoms");
        assert_eq!(show.center_label(), Some("Handshake"));
        assert_eq!(show.phrase_pool().len(), 3);
    }

    #[test]
    fn unknown_show_is_not_found() {
        let store = JsonShowStore::from_json(STORE).expect("parse");
        let err = store.show("missing").unwrap_err();
        assert!(matches!(err, BingoError::ShowNotFound(id) if id == "missing"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(STORE.as_bytes()).expect("write");
        let store = JsonShowStore::from_path(file.path()).expect("load");
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn malformed_file_is_a_json_error() {
        let err = JsonShowStore::from_json("{ \"shows\": 3 }").unwrap_err();
        assert!(matches!(err, BingoError::Json(_)));
    }
}
