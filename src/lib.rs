//! # show_bingo
//!
//! Phrase bingo for TV shows. A show carries a pool of phrases; a player gets
//! a randomized 5x5 card dealt from that pool and marks squares while
//! watching.
//!
//! 1. Fetch a [`Show`] through a [`ShowSource`] (for example [`JsonShowStore`]).
//! 2. Open a [`PlaySession`] for it and call [`PlaySession::start`] to deal a
//!    card. The center square starts marked.
//! 3. Call [`PlaySession::toggle`] as phrases come up; every toggle returns
//!    the full [`WinState`] recomputed from the marks.
//! 4. [`PlaySession::request_regenerate`] tells the caller whether to ask
//!    before discarding marks; answer with `confirm_regenerate` or
//!    `cancel_regenerate`.
//!
//! ```rust
//! use show_bingo::{PlaySession, PhrasePool, RegenerateDecision, RngSource};
//!
//! let pool: PhrasePool = (0..30).map(|i| format!("Phrase {i}")).collect();
//! let mut session = PlaySession::new("My Show", pool, None, RngSource::seeded(7));
//! session.start().expect("enough phrases");
//!
//! for index in [10, 11, 13, 14] {
//!     session.toggle(index).expect("valid cell");
//! }
//! assert!(session.win_state().expect("card").has_won());
//! assert_eq!(session.request_regenerate(), RegenerateDecision::ConfirmationRequired);
//! ```

pub mod board_renderer;
pub mod card;
pub mod error;
pub mod logging;
pub mod random;
pub mod selection;
pub mod session;
pub mod show;
pub mod win;

pub use card::{BingoCard, CardGenerator, Cell, CENTER_INDEX, CELL_COUNT, DEFAULT_CENTER_LABEL, PHRASES_PER_CARD};
pub use error::{BingoError, InsufficientPhrasesError, Result};
pub use random::{RandomSource, RngSource, SequenceSource};
pub use session::{PlaySession, RegenerateDecision, RenderCell, RenderModel, SessionState};
pub use show::{JsonShowStore, PhrasePool, Show, ShowSource};
pub use win::{Diagonal, WinState, WinningLine};
