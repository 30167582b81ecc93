//! Mark state of a card's cells.
//!
//! These functions are the only writers of [`Cell`](crate::card::Cell) marks.

use crate::card::{BingoCard, CELL_COUNT, CENTER_INDEX};
use crate::error::{BingoError, Result};

/// Mark only the center cell. Called once per freshly dealt card.
pub fn initialize(card: &mut BingoCard) {
    for (index, cell) in card.cells_mut().iter_mut().enumerate() {
        cell.marked = index == CENTER_INDEX;
    }
}

/// Flip the mark on one cell and return its new state.
///
/// The center is not locked; it toggles like any other cell.
pub fn toggle(card: &mut BingoCard, index: usize) -> Result<bool> {
    let cell = card
        .cells_mut()
        .get_mut(index)
        .ok_or(BingoError::CellOutOfRange {
            index,
            limit: CELL_COUNT,
        })?;
    cell.marked = !cell.marked;
    tracing::debug!(index, marked = cell.marked, "toggled cell");
    Ok(cell.marked)
}

/// Clear all marks, then re-mark the center.
pub fn reset(card: &mut BingoCard) {
    initialize(card);
}

/// Whether any cell besides the center is marked.
pub fn has_non_center_marks(card: &BingoCard) -> bool {
    card.cells()
        .iter()
        .enumerate()
        .any(|(index, cell)| index != CENTER_INDEX && cell.is_marked())
}

pub fn marked_indices(card: &BingoCard) -> Vec<usize> {
    card.cells()
        .iter()
        .enumerate()
        .filter_map(|(index, cell)| cell.is_marked().then_some(index))
        .collect()
}
