//! A single play session: the current card, its marks, and the
//! regenerate / reset flow around them.
//!
//! Regeneration is a two-step protocol. [`PlaySession::request_regenerate`]
//! reports whether the caller has to ask the player first; the caller then
//! answers with [`PlaySession::confirm_regenerate`] or
//! [`PlaySession::cancel_regenerate`].

use crate::card::{BingoCard, CardGenerator, Cell};
use crate::error::{BingoError, Result};
use crate::random::RandomSource;
use crate::selection;
use crate::show::{PhrasePool, Show};
use crate::win::{self, WinState, WinningLine};

/// Outcome of asking for a new card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenerateDecision {
    /// Nothing would be lost; regenerate right away.
    Proceed,
    /// Marks beyond the center would be discarded; ask the player first.
    ConfirmationRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoCard,
    CardReady,
    /// Generation failed; play is blocked until the pool grows.
    InsufficientPhrases { required: usize, actual: usize },
}

/// One cell as the presentation layer sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCell {
    pub content: String,
    pub is_center: bool,
    pub marked: bool,
    pub is_winning: bool,
}

/// Everything needed to draw the current card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderModel {
    pub title: String,
    pub cells: Vec<RenderCell>,
    pub winning_lines: Vec<WinningLine>,
}

impl RenderModel {
    pub fn has_won(&self) -> bool {
        !self.winning_lines.is_empty()
    }
}

pub struct PlaySession<R> {
    title: String,
    pool: PhrasePool,
    center_label: Option<String>,
    generator: CardGenerator<R>,
    card: Option<BingoCard>,
    state: SessionState,
    pending_regenerate: bool,
}

impl<R: RandomSource> PlaySession<R> {
    pub fn new(
        title: impl Into<String>,
        pool: PhrasePool,
        center_label: Option<String>,
        random: R,
    ) -> Self {
        Self {
            title: title.into(),
            pool,
            center_label,
            generator: CardGenerator::new(random),
            card: None,
            state: SessionState::NoCard,
            pending_regenerate: false,
        }
    }

    /// Session for a show fetched from the show service.
    pub fn for_show(show: &Show, random: R) -> Self {
        Self::new(
            show.display_title(),
            show.phrase_pool(),
            show.center_square.clone(),
            random,
        )
    }

    /// Deal the first card.
    pub fn start(&mut self) -> Result<&BingoCard> {
        self.deal()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn card(&self) -> Option<&BingoCard> {
        self.card.as_ref()
    }

    /// Whether a gated regeneration is waiting for the player's answer.
    pub fn is_regenerate_pending(&self) -> bool {
        self.pending_regenerate
    }

    /// Toggle one cell and re-evaluate the whole card.
    pub fn toggle(&mut self, index: usize) -> Result<WinState> {
        let card = self.card.as_mut().ok_or(BingoError::NoActiveCard)?;
        selection::toggle(card, index)?;
        let wins = win::evaluate(card);
        if wins.has_won() {
            tracing::info!(lines = wins.len(), "bingo");
        }
        Ok(wins)
    }

    pub fn win_state(&self) -> Result<WinState> {
        self.card
            .as_ref()
            .map(win::evaluate)
            .ok_or(BingoError::NoActiveCard)
    }

    /// Ask for a new card. Gated when non-center marks would be lost;
    /// only then is a confirmation left pending.
    pub fn request_regenerate(&mut self) -> RegenerateDecision {
        let decision = match &self.card {
            Some(card) if selection::has_non_center_marks(card) => {
                RegenerateDecision::ConfirmationRequired
            }
            _ => RegenerateDecision::Proceed,
        };
        self.pending_regenerate = decision == RegenerateDecision::ConfirmationRequired;
        decision
    }

    /// Replace the card with a freshly dealt one, center marked.
    ///
    /// Does not check for a pending confirmation: calling it is the
    /// player's answer. Also works with no card, which is how a session
    /// blocked in [`SessionState::InsufficientPhrases`] recovers.
    ///
    /// On failure the old card is gone and the session is blocked in
    /// [`SessionState::InsufficientPhrases`].
    pub fn confirm_regenerate(&mut self) -> Result<&BingoCard> {
        self.pending_regenerate = false;
        tracing::info!(title = %self.title, "regenerating card");
        self.deal()
    }

    pub fn cancel_regenerate(&mut self) {
        if self.pending_regenerate {
            tracing::debug!("regeneration cancelled");
        }
        self.pending_regenerate = false;
    }

    /// Clear marks on the current card without reshuffling.
    pub fn reset_marks_only(&mut self) -> Result<()> {
        let card = self.card.as_mut().ok_or(BingoError::NoActiveCard)?;
        selection::reset(card);
        tracing::info!("marks reset");
        Ok(())
    }

    /// Swap in an edited phrase pool. Only the next deal sees it; the card
    /// on screen stays as it is.
    pub fn replace_pool(&mut self, pool: PhrasePool) {
        tracing::debug!(phrases = pool.len(), "phrase pool replaced");
        self.pool = pool;
    }

    pub fn render(&self) -> Option<RenderModel> {
        let card = self.card.as_ref()?;
        let wins = win::evaluate(card);
        let winning = wins.winning_cells();
        let cells = card
            .cells()
            .iter()
            .zip(winning)
            .map(|(cell, is_winning)| render_cell(cell, is_winning))
            .collect();
        Some(RenderModel {
            title: self.title.clone(),
            cells,
            winning_lines: wins.lines().collect(),
        })
    }

    fn deal(&mut self) -> Result<&BingoCard> {
        self.card = None;
        match self.generator.generate(&self.pool, self.center_label.as_deref()) {
            Ok(mut card) => {
                selection::initialize(&mut card);
                self.state = SessionState::CardReady;
                Ok(self.card.insert(card))
            }
            Err(err) => {
                tracing::warn!(required = err.required, actual = err.actual, "cannot deal a card");
                self.state = SessionState::InsufficientPhrases {
                    required: err.required,
                    actual: err.actual,
                };
                Err(err.into())
            }
        }
    }
}

fn render_cell(cell: &Cell, is_winning: bool) -> RenderCell {
    RenderCell {
        content: cell.content().to_string(),
        is_center: cell.is_center(),
        marked: cell.is_marked(),
        is_winning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CELL_COUNT, CENTER_INDEX};
    use crate::card::tests::pool_of;
    use crate::random::RngSource;
    use crate::win::Diagonal;
    use rand::rngs::StdRng;

    fn session(phrases: usize) -> PlaySession<RngSource<StdRng>> {
        PlaySession::new("Test Show", pool_of(phrases), None, RngSource::seeded(8))
    }

    fn started() -> PlaySession<RngSource<StdRng>> {
        let mut s = session(40);
        s.start().expect("start");
        s
    }

    #[test]
    fn start_marks_center() {
        let s = started();
        assert_eq!(s.state(), SessionState::CardReady);
        let card = s.card().expect("card");
        assert_eq!(selection::marked_indices(card), vec![CENTER_INDEX]);
    }

    #[test]
    fn start_with_small_pool_blocks_play() {
        let mut s = session(10);
        let err = s.start().unwrap_err();
        assert!(err.insufficient_phrases().is_some());
        assert_eq!(
            s.state(),
            SessionState::InsufficientPhrases {
                required: 24,
                actual: 10
            }
        );
        assert!(s.card().is_none());
        assert!(s.render().is_none());
        assert!(matches!(s.toggle(0), Err(BingoError::NoActiveCard)));
    }

    #[test]
    fn toggle_reports_wins() {
        let mut s = started();
        for index in [0, 6, 18] {
            assert!(!s.toggle(index).expect("toggle").has_won());
        }
        let wins = s.toggle(24).expect("toggle");
        assert!(wins.contains(WinningLine::Diagonal(Diagonal::Main)));
        let wins = s.toggle(0).expect("toggle");
        assert!(!wins.has_won());
    }

    #[test]
    fn regenerate_without_marks_proceeds() {
        let mut s = started();
        assert_eq!(s.request_regenerate(), RegenerateDecision::Proceed);
        assert!(!s.is_regenerate_pending());
    }

    #[test]
    fn confirm_clears_a_pending_request() {
        let mut s = started();
        s.toggle(0).expect("toggle");
        s.request_regenerate();
        assert!(s.is_regenerate_pending());
        s.confirm_regenerate().expect("regenerate");
        assert!(!s.is_regenerate_pending());
        assert_eq!(s.request_regenerate(), RegenerateDecision::Proceed);
        assert!(!s.is_regenerate_pending());
    }

    #[test]
    fn regenerate_with_marks_needs_confirmation() {
        let mut s = started();
        s.toggle(3).expect("toggle");
        assert_eq!(s.request_regenerate(), RegenerateDecision::ConfirmationRequired);
        assert!(s.is_regenerate_pending());

        let before = s.card().cloned();
        s.cancel_regenerate();
        assert!(!s.is_regenerate_pending());
        assert_eq!(s.card().cloned(), before);

        s.request_regenerate();
        s.confirm_regenerate().expect("regenerate");
        let card = s.card().expect("card");
        assert_eq!(selection::marked_indices(card), vec![CENTER_INDEX]);
    }

    #[test]
    fn unmarked_center_alone_does_not_gate() {
        let mut s = started();
        s.toggle(CENTER_INDEX).expect("toggle");
        assert_eq!(s.request_regenerate(), RegenerateDecision::Proceed);
    }

    #[test]
    fn reset_keeps_card_contents() {
        let mut s = started();
        let contents: Vec<String> = s
            .card()
            .expect("card")
            .contents()
            .into_iter()
            .map(String::from)
            .collect();
        for index in [1, 2, 3] {
            s.toggle(index).expect("toggle");
        }
        s.reset_marks_only().expect("reset");
        let card = s.card().expect("card");
        assert_eq!(card.contents(), contents);
        assert_eq!(selection::marked_indices(card), vec![CENTER_INDEX]);
    }

    #[test]
    fn pool_edits_apply_to_next_deal_only() {
        let mut s = started();
        s.replace_pool(pool_of(5));
        assert!(s.card().is_some());
        s.toggle(1).expect("toggle");

        let err = s.confirm_regenerate().unwrap_err();
        assert!(err.insufficient_phrases().is_some());
        assert!(s.card().is_none());
        assert!(matches!(s.state(), SessionState::InsufficientPhrases { actual: 5, .. }));

        s.replace_pool(pool_of(24));
        s.confirm_regenerate().expect("regenerate");
        assert_eq!(s.state(), SessionState::CardReady);
    }

    #[test]
    fn render_flags_winning_cells() {
        let mut s = started();
        for index in [10, 11, 13, 14] {
            s.toggle(index).expect("toggle");
        }
        let model = s.render().expect("model");
        assert_eq!(model.title, "Test Show");
        assert_eq!(model.cells.len(), CELL_COUNT);
        assert_eq!(model.winning_lines, vec![WinningLine::Row(2)]);
        assert!(model.has_won());
        for (index, cell) in model.cells.iter().enumerate() {
            assert_eq!(cell.is_winning, (10..15).contains(&index), "index {index}");
        }
        assert!(model.cells[CENTER_INDEX].is_center);
    }

    #[test]
    fn for_show_uses_center_square() {
        let show = Show {
            id: "s".into(),
            show_title: "Show".into(),
            game_title: None,
            center_square: Some("Cliffhanger".into()),
            phrases: (0..24).map(|i| format!("p{i}")).collect(),
        };
        let mut s = PlaySession::for_show(&show, RngSource::seeded(1));
        let card = s.start().expect("start");
        assert_eq!(card.center().content(), "Cliffhanger");
    }
}
