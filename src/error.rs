//! Error types for card generation, play sessions and show loading.

use thiserror::Error;

/// A card cannot be built because the phrase pool is too small.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not enough phrases to fill a card: need at least {required}, found {actual}")]
pub struct InsufficientPhrasesError {
    /// Minimum number of phrases a pool must hold.
    pub required: usize,
    /// Number of phrases the pool actually held.
    pub actual: usize,
}

/// Errors surfaced by the bingo engine and its collaborators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BingoError {
    #[error(transparent)]
    InsufficientPhrases(#[from] InsufficientPhrasesError),

    /// Cell index outside the 5x5 grid.
    #[error("cell index {index} is out of range (expected 0..{limit})")]
    CellOutOfRange { index: usize, limit: usize },

    /// An operation needed a card but the session has none.
    #[error("no active card in this session")]
    NoActiveCard,

    /// The show store has no entry with this identifier.
    #[error("show not found: {0}")]
    ShowNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// No usable font could be found for rendering.
    #[error("no system font found for rendering")]
    FontUnavailable,

    #[error("invalid font data")]
    InvalidFont,
}

impl BingoError {
    /// The shortfall, when the user can fix this by adding phrases to the show.
    #[must_use]
    pub fn insufficient_phrases(&self) -> Option<&InsufficientPhrasesError> {
        match self {
            Self::InsufficientPhrases(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BingoError>;
