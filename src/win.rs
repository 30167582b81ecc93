//! Win detection over the 12 fixed lines of a card.
//!
//! Win state is derived from the marks every time it is asked for; nothing
//! is cached between evaluations.

use std::collections::BTreeSet;
use std::fmt;

use crate::card::{BingoCard, CELL_COUNT, GRID_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Diagonal {
    /// Top-left to bottom-right.
    Main,
    /// Top-right to bottom-left.
    Anti,
}

/// A row, column or diagonal that wins when all five cells are marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WinningLine {
    Row(u8),
    Column(u8),
    Diagonal(Diagonal),
}

impl WinningLine {
    pub const ALL: [WinningLine; 12] = [
        WinningLine::Row(0),
        WinningLine::Row(1),
        WinningLine::Row(2),
        WinningLine::Row(3),
        WinningLine::Row(4),
        WinningLine::Column(0),
        WinningLine::Column(1),
        WinningLine::Column(2),
        WinningLine::Column(3),
        WinningLine::Column(4),
        WinningLine::Diagonal(Diagonal::Main),
        WinningLine::Diagonal(Diagonal::Anti),
    ];

    /// Cell indices covered by this line, in grid order.
    pub fn cells(self) -> [usize; GRID_SIZE] {
        std::array::from_fn(|k| match self {
            WinningLine::Row(r) => usize::from(r) * GRID_SIZE + k,
            WinningLine::Column(c) => k * GRID_SIZE + usize::from(c),
            WinningLine::Diagonal(Diagonal::Main) => k * (GRID_SIZE + 1),
            WinningLine::Diagonal(Diagonal::Anti) => (k + 1) * (GRID_SIZE - 1),
        })
    }

    pub fn contains(self, index: usize) -> bool {
        self.cells().contains(&index)
    }

    fn is_complete(self, card: &BingoCard) -> bool {
        self.cells().iter().all(|&index| card.is_marked(index))
    }
}

impl fmt::Display for WinningLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WinningLine::Row(r) => write!(f, "row {}", r + 1),
            WinningLine::Column(c) => write!(f, "column {}", c + 1),
            WinningLine::Diagonal(Diagonal::Main) => f.write_str("main diagonal"),
            WinningLine::Diagonal(Diagonal::Anti) => f.write_str("anti diagonal"),
        }
    }
}

/// The lines currently completed on a card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WinState {
    lines: BTreeSet<WinningLine>,
}

impl WinState {
    pub fn has_won(&self) -> bool {
        !self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn contains(&self, line: WinningLine) -> bool {
        self.lines.contains(&line)
    }

    pub fn lines(&self) -> impl Iterator<Item = WinningLine> + '_ {
        self.lines.iter().copied()
    }

    /// Per-cell flag: true when the cell belongs to any completed line.
    pub fn winning_cells(&self) -> [bool; CELL_COUNT] {
        let mut cells = [false; CELL_COUNT];
        for index in self.lines.iter().flat_map(|line| line.cells()) {
            cells[index] = true;
        }
        cells
    }
}

/// Every line whose five cells are all marked.
pub fn evaluate(card: &BingoCard) -> WinState {
    let lines = WinningLine::ALL
        .into_iter()
        .filter(|line| line.is_complete(card))
        .collect();
    WinState { lines }
}

pub fn has_won(card: &BingoCard) -> bool {
    evaluate(card).has_won()
}
