//! Bingo cards and the generator that deals them from a phrase pool.

use crate::error::InsufficientPhrasesError;
use crate::random::RandomSource;
use crate::show::PhrasePool;

pub const GRID_SIZE: usize = 5;
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;
/// Row 2, column 2.
pub const CENTER_INDEX: usize = CELL_COUNT / 2;
pub const PHRASES_PER_CARD: usize = CELL_COUNT - 1;
pub const DEFAULT_CENTER_LABEL: &str = "FREE SPACE";

/// One square of a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    content: String,
    is_center: bool,
    pub(crate) marked: bool,
}

impl Cell {
    fn phrase(content: String) -> Self {
        Self {
            content,
            is_center: false,
            marked: false,
        }
    }

    fn center(label: String) -> Self {
        Self {
            content: label,
            is_center: true,
            marked: false,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_center(&self) -> bool {
        self.is_center
    }

    pub fn is_marked(&self) -> bool {
        self.marked
    }
}

/// A 5x5 card laid out row-major. Index 12 is always the center cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BingoCard {
    cells: Vec<Cell>,
}

impl BingoCard {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn center(&self) -> &Cell {
        &self.cells[CENTER_INDEX]
    }

    /// Cell contents in grid order.
    pub fn contents(&self) -> Vec<&str> {
        self.cells.iter().map(Cell::content).collect()
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.cells.get(index).is_some_and(Cell::is_marked)
    }
}

/// Deals cards by shuffling a phrase pool with an injected random source.
#[derive(Debug, Clone)]
pub struct CardGenerator<R> {
    random: R,
}

impl<R: RandomSource> CardGenerator<R> {
    pub fn new(random: R) -> Self {
        Self { random }
    }

    /// Build a card from 24 shuffled phrases around the center label.
    ///
    /// A missing or blank `center_label` falls back to [`DEFAULT_CENTER_LABEL`].
    /// The pool itself is never modified.
    ///
    /// # Errors
    ///
    /// Returns [`InsufficientPhrasesError`] when the pool holds fewer than
    /// [`PHRASES_PER_CARD`] phrases.
    pub fn generate(
        &mut self,
        pool: &PhrasePool,
        center_label: Option<&str>,
    ) -> Result<BingoCard, InsufficientPhrasesError> {
        if pool.len() < PHRASES_PER_CARD {
            tracing::debug!(available = pool.len(), "phrase pool too small for a card");
            return Err(InsufficientPhrasesError {
                required: PHRASES_PER_CARD,
                actual: pool.len(),
            });
        }

        let mut shuffled: Vec<&String> = pool.as_slice().iter().collect();
        // Fisher-Yates shuffle
        for i in (1..shuffled.len()).rev() {
            let j = self.random.index_up_to(i);
            shuffled.swap(i, j);
        }

        let label = center_label
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_CENTER_LABEL);

        let mut phrases = shuffled.into_iter().take(PHRASES_PER_CARD);
        let cells = (0..CELL_COUNT)
            .map(|index| {
                if index == CENTER_INDEX {
                    Cell::center(label.to_string())
                } else {
                    // take() above yields exactly PHRASES_PER_CARD entries
                    Cell::phrase(phrases.next().cloned().unwrap_or_default())
                }
            })
            .collect();

        tracing::debug!(pool = pool.len(), center = label, "generated card");
        Ok(BingoCard { cells })
    }
}
