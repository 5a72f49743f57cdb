//! Session state.
//!
//! One [`SessionState`] value exists per game and is owned by the engine.
//! It is replaced wholesale when a new session starts - never mutated
//! field-by-field from scattered call sites - and all mutators are
//! crate-private so the state machine invariants hold by construction:
//!
//! - at most two positions are face-up at once
//! - a position is never simultaneously face-up and resolved
//! - `resolved_pairs <= pair_count`
//! - input is locked while a mismatch awaits settling and after the
//!   session has ended

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardToken;
use crate::levels::{Difficulty, LevelConfig};
use crate::score;

/// Per-position card state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardState {
    /// Face-down, selectable.
    Hidden,
    /// Face-up, awaiting its partner or a revert. Transient.
    FaceUp,
    /// Matched. Terminal for the position.
    Resolved,
}

/// How a finished session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Won,
    TimedOut,
}

/// Session lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Active,
    Ended(EndReason),
}

/// Complete state of one game session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionState {
    difficulty: Difficulty,
    config: LevelConfig,
    deck: Vec<CardToken>,
    card_states: Vec<CardState>,
    face_up: SmallVec<[usize; 2]>,
    moves: u32,
    mismatches: u32,
    resolved_pairs: usize,
    remaining_secs: u32,
    input_locked: bool,
    status: SessionStatus,
}

impl SessionState {
    /// Create a fresh active session over a built deck.
    #[must_use]
    pub(crate) fn new(difficulty: Difficulty, deck: Vec<CardToken>) -> Self {
        let config = difficulty.config();
        debug_assert_eq!(deck.len(), 2 * config.pair_count);

        let card_states = vec![CardState::Hidden; deck.len()];
        Self {
            difficulty,
            config,
            deck,
            card_states,
            face_up: SmallVec::new(),
            moves: 0,
            mismatches: 0,
            resolved_pairs: 0,
            remaining_secs: config.time_budget_secs,
            input_locked: false,
            status: SessionStatus::Active,
        }
    }

    // === Queries ===

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn config(&self) -> LevelConfig {
        self.config
    }

    /// The session's deck, in board order.
    #[must_use]
    pub fn deck(&self) -> &[CardToken] {
        &self.deck
    }

    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.config.pair_count
    }

    /// State of the card at `position`, or `None` when out of range.
    #[must_use]
    pub fn card_state(&self, position: usize) -> Option<CardState> {
        self.card_states.get(position).copied()
    }

    /// Positions currently face-up awaiting comparison, in flip order.
    #[must_use]
    pub fn face_up(&self) -> &[usize] {
        &self.face_up
    }

    #[must_use]
    pub fn moves(&self) -> u32 {
        self.moves
    }

    #[must_use]
    pub fn mismatches(&self) -> u32 {
        self.mismatches
    }

    #[must_use]
    pub fn resolved_pairs(&self) -> usize {
        self.resolved_pairs
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Seconds consumed from the time budget.
    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.config.time_budget_secs - self.remaining_secs
    }

    #[must_use]
    pub fn input_locked(&self) -> bool {
        self.input_locked
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Are all pairs resolved?
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.resolved_pairs == self.config.pair_count
    }

    /// Running score given the counters so far.
    #[must_use]
    pub fn current_score(&self) -> u32 {
        score::compute(
            self.moves,
            self.elapsed_secs(),
            self.mismatches,
            self.config.mismatch_penalty_weight,
        )
    }

    /// May the card at `position` be selected right now?
    ///
    /// Encodes the no-op guards: session over, input locked, position out
    /// of range, already face-up, or already resolved.
    #[must_use]
    pub fn can_select(&self, position: usize) -> bool {
        self.is_active()
            && !self.input_locked
            && self.card_state(position) == Some(CardState::Hidden)
    }

    // === Mutators (engine-only) ===

    /// Turn a hidden card face-up. Caller must have checked `can_select`.
    pub(crate) fn flip_up(&mut self, position: usize) {
        debug_assert!(self.can_select(position));
        debug_assert!(self.face_up.len() < 2);

        self.card_states[position] = CardState::FaceUp;
        self.face_up.push(position);
    }

    /// Count a completed two-card comparison.
    pub(crate) fn record_move(&mut self) {
        self.moves += 1;
    }

    /// Resolve the two face-up cards as a match.
    ///
    /// Returns the resolved positions in flip order.
    pub(crate) fn resolve_face_up(&mut self) -> [usize; 2] {
        debug_assert_eq!(self.face_up.len(), 2);

        let positions = [self.face_up[0], self.face_up[1]];
        for &position in &positions {
            self.card_states[position] = CardState::Resolved;
        }
        self.face_up.clear();
        self.resolved_pairs += 1;
        debug_assert!(self.resolved_pairs <= self.config.pair_count);

        positions
    }

    /// Count a mismatch and lock input until the pair settles.
    pub(crate) fn begin_mismatch(&mut self) {
        debug_assert_eq!(self.face_up.len(), 2);
        self.mismatches += 1;
        self.input_locked = true;
    }

    /// Settle a mismatch: both face-up cards return to hidden.
    ///
    /// Returns the reverted positions in flip order.
    pub(crate) fn revert_face_up(&mut self) -> [usize; 2] {
        debug_assert_eq!(self.face_up.len(), 2);

        let positions = [self.face_up[0], self.face_up[1]];
        for &position in &positions {
            self.card_states[position] = CardState::Hidden;
        }
        self.face_up.clear();
        self.input_locked = false;

        positions
    }

    /// Consume one second of the budget. Returns the new remainder.
    pub(crate) fn tick_down(&mut self) -> u32 {
        debug_assert!(self.is_active());
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.remaining_secs
    }

    /// Terminate the session. Input stays locked from here on.
    pub(crate) fn end(&mut self, reason: EndReason) {
        self.status = SessionStatus::Ended(reason);
        self.input_locked = true;
    }
}
