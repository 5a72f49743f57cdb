//! The match engine state machine.
//!
//! [`MatchEngine`] owns the current session, the root RNG, the countdown
//! gate, and the best-score records. Hosts drive it through three inbound
//! operations - [`start_session`](MatchEngine::start_session),
//! [`select_card`](MatchEngine::select_card), and a 1 Hz
//! [`tick`](MatchEngine::tick) - and observe it through
//! [`EngineEvent`]s plus read-only queries.
//!
//! ## Deferred execution
//!
//! Everything mutates synchronously except the mismatch revert: a
//! mismatched pair stays face-up for a visual settle delay before flipping
//! back, so [`select_card`](MatchEngine::select_card) hands the host a
//! [`RevertToken`] to redeem via
//! [`settle_mismatch`](MatchEngine::settle_mismatch) after
//! [`SETTLE_DELAY_MS`]. Tokens are scoped to the single mismatch that
//! issued them: redemption is one-shot, and a callback that outlives its
//! mismatch or its session is discarded, never applied to a successor.
//! Timer ticks are gated the same way through [`TimerToken`].
//!
//! All operations run on the host's single event loop; `input_locked` is
//! the only backpressure mechanism and no locking is involved.

use crate::best::{BestScores, ScoreStorage};
use crate::cards::SYMBOL_POOL;
use crate::deck;
use crate::error::EngineError;
use crate::events::{EngineEvent, EventSink, WinSummary};
use crate::levels::Difficulty;
use crate::rng::GameRng;
use crate::session::{EndReason, SessionState, SessionStatus};
use crate::timer::{CountdownTimer, TimerToken};

/// How long a mismatched pair stays face-up, in milliseconds.
///
/// Purely cosmetic - hosts schedule `settle_mismatch` with it, but
/// correctness depends only on the token check, so any delay works.
pub const SETTLE_DELAY_MS: u64 = 700;

/// Proof that a revert belongs to the currently pending mismatch.
///
/// Each mismatch issues a distinct token, so redemption is one-shot: a
/// token already redeemed, or outlived by its session, never settles a
/// later mismatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevertToken {
    serial: u64,
}

/// What a card selection did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Guard condition hit; nothing changed.
    Ignored,
    /// First card of a pair turned face-up.
    FirstFlip,
    /// Second card matched; `won` marks the final pair.
    Match { won: bool },
    /// Second card mismatched. Redeem the token after the settle delay.
    Mismatch(RevertToken),
}

/// What a timer tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stale or stopped-timer tick; nothing changed.
    Ignored,
    /// One second consumed, session still running.
    Counting { remaining_secs: u32 },
    /// The budget ran out; the session ended timed-out.
    Expired,
}

/// Headless memory-matching game engine.
pub struct MatchEngine<S> {
    session: Option<SessionState>,
    rng: GameRng,
    timer: CountdownTimer,
    best: BestScores<S>,
    /// Bumped on every mismatch; each revert token carries its serial.
    revert_serial: u64,
    /// Serial of the mismatch currently awaiting settlement, if any.
    pending_revert: Option<u64>,
}

impl<S: ScoreStorage> MatchEngine<S> {
    /// Create an engine with a deterministic deck seed.
    pub fn new(storage: S, seed: u64) -> Self {
        Self {
            session: None,
            rng: GameRng::new(seed),
            timer: CountdownTimer::new(),
            best: BestScores::new(storage),
            revert_serial: 0,
            pending_revert: None,
        }
    }

    /// Create an engine seeded from OS entropy.
    pub fn from_entropy(storage: S) -> Self {
        Self {
            session: None,
            rng: GameRng::from_entropy(),
            timer: CountdownTimer::new(),
            best: BestScores::new(storage),
            revert_serial: 0,
            pending_revert: None,
        }
    }

    // === Inbound operations ===

    /// Start a new session, replacing any previous one wholesale.
    ///
    /// Stops the old countdown and invalidates outstanding revert tokens
    /// before touching state, builds a fresh deck, and returns the
    /// [`TimerToken`] the host scheduler must present with each 1 Hz tick.
    pub fn start_session(
        &mut self,
        difficulty: Difficulty,
        sink: &mut dyn EventSink,
    ) -> Result<TimerToken, EngineError> {
        // Cancel deferred work first, then mutate.
        self.timer.stop();
        self.pending_revert = None;

        let config = difficulty.config();
        let mut session_rng = self.rng.fork();
        let deck = deck::build(config.pair_count, SYMBOL_POOL, &mut session_rng)?;

        self.session = Some(SessionState::new(difficulty, deck));
        log::info!(
            "session started: {} ({} pairs, {}s budget)",
            difficulty,
            config.pair_count,
            config.time_budget_secs
        );

        let token = self.timer.start();
        sink.on_event(&EngineEvent::SessionStarted {
            difficulty,
            time_budget_secs: config.time_budget_secs,
        });
        self.emit_hud(sink);

        Ok(token)
    }

    /// Select the card at `position`.
    ///
    /// Guard conditions - no session, session over, input locked, card
    /// already face-up or resolved, position out of range - are silent
    /// no-ops returning [`SelectOutcome::Ignored`].
    pub fn select_card(&mut self, position: usize, sink: &mut dyn EventSink) -> SelectOutcome {
        let Some(session) = self.session.as_mut() else {
            return SelectOutcome::Ignored;
        };
        if !session.can_select(position) {
            return SelectOutcome::Ignored;
        }

        session.flip_up(position);
        sink.on_event(&EngineEvent::CardFlipped { position });

        if session.face_up().len() < 2 {
            return SelectOutcome::FirstFlip;
        }

        // Second card: the comparison happens synchronously, so no third
        // concurrent flip is ever possible.
        session.record_move();
        let [first, second] = [session.face_up()[0], session.face_up()[1]];
        let matched = session.deck()[first].matches(&session.deck()[second]);

        if matched {
            let positions = session.resolve_face_up();
            let symbol_key = session.deck()[positions[0]].symbol_key.clone();
            sink.on_event(&EngineEvent::PairResolved {
                positions,
                symbol_key,
            });
            self.emit_hud(sink);

            let won = self
                .session
                .as_ref()
                .is_some_and(|session| session.is_complete());
            if won {
                self.finish_won(sink);
            }
            SelectOutcome::Match { won }
        } else {
            session.begin_mismatch();
            self.emit_hud(sink);

            self.revert_serial += 1;
            self.pending_revert = Some(self.revert_serial);
            SelectOutcome::Mismatch(RevertToken {
                serial: self.revert_serial,
            })
        }
    }

    /// Settle a pending mismatch: flip both cards back and unlock input.
    ///
    /// Called by the host after [`SETTLE_DELAY_MS`]. A token from a
    /// superseded session, or one already redeemed, is discarded without
    /// mutating anything. Returns whether a revert happened.
    pub fn settle_mismatch(&mut self, token: RevertToken, sink: &mut dyn EventSink) -> bool {
        if self.pending_revert != Some(token.serial) {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        // The lock plus two face-up cards is exactly the pending-revert
        // state; a timeout in between drops the lock's revert by ending
        // the session first.
        if !session.is_active() || !session.input_locked() || session.face_up().len() != 2 {
            return false;
        }

        self.pending_revert = None;
        let positions = session.revert_face_up();
        sink.on_event(&EngineEvent::CardsReverted { positions });
        true
    }

    /// Consume one second of the countdown.
    ///
    /// Invoked by the host scheduler once per second with the token from
    /// `start_session`. Late ticks - after a stop or from a replaced
    /// session - are discarded.
    pub fn tick(&mut self, token: TimerToken, sink: &mut dyn EventSink) -> TickOutcome {
        if !self.timer.accepts(token) {
            return TickOutcome::Ignored;
        }
        let Some(session) = self.session.as_mut() else {
            return TickOutcome::Ignored;
        };
        if !session.is_active() {
            return TickOutcome::Ignored;
        }

        let remaining_secs = session.tick_down();
        if remaining_secs > 0 {
            return TickOutcome::Counting { remaining_secs };
        }

        // Cancel first, then end the session.
        self.timer.stop();
        session.end(EndReason::TimedOut);

        let resolved_pairs = session.resolved_pairs();
        let pair_count = session.pair_count();
        log::info!(
            "session timed out: {}/{} pairs resolved",
            resolved_pairs,
            pair_count
        );
        sink.on_event(&EngineEvent::SessionTimedOut {
            resolved_pairs,
            pair_count,
        });
        TickOutcome::Expired
    }

    // === Queries ===

    /// The current session, if one has been started.
    #[must_use]
    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    /// Is a session running?
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(SessionState::is_active)
    }

    /// Lifecycle state of the current session, if any.
    #[must_use]
    pub fn status(&self) -> Option<SessionStatus> {
        self.session.as_ref().map(SessionState::status)
    }

    /// Stored best score for a difficulty.
    #[must_use]
    pub fn best_score(&self, difficulty: Difficulty) -> Option<u32> {
        self.best.load(difficulty)
    }

    // === Internals ===

    fn finish_won(&mut self, sink: &mut dyn EventSink) {
        // Cancel deferred work before the terminal transition.
        self.timer.stop();

        let session = self
            .session
            .as_mut()
            .expect("finish_won requires a session");
        session.end(EndReason::Won);

        let summary = WinSummary {
            moves: session.moves(),
            mismatches: session.mismatches(),
            elapsed_secs: session.elapsed_secs(),
            score: session.current_score(),
            is_new_best: false,
        };
        let difficulty = session.difficulty();

        let outcome = self.best.save(difficulty, summary.score);
        let summary = WinSummary {
            is_new_best: outcome.updated,
            ..summary
        };

        log::info!(
            "session won: {} moves, {} mismatches, {}s, score {}",
            summary.moves,
            summary.mismatches,
            summary.elapsed_secs,
            summary.score
        );
        sink.on_event(&EngineEvent::SessionWon(summary));
    }

    fn emit_hud(&self, sink: &mut dyn EventSink) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        sink.on_event(&EngineEvent::HudUpdate {
            moves: session.moves(),
            resolved_pairs: session.resolved_pairs(),
            pair_count: session.pair_count(),
            score: session.current_score(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::best::MemoryStorage;
    use crate::events::NullSink;

    fn engine() -> MatchEngine<MemoryStorage> {
        MatchEngine::new(MemoryStorage::new(), 42)
    }

    #[test]
    fn test_select_before_start_is_ignored() {
        let mut engine = engine();
        let outcome = engine.select_card(0, &mut NullSink);
        assert_eq!(outcome, SelectOutcome::Ignored);
        assert!(engine.session().is_none());
    }

    #[test]
    fn test_start_session_issues_fresh_token() {
        let mut engine = engine();

        let stale = engine
            .start_session(Difficulty::Easy, &mut NullSink)
            .unwrap();
        let fresh = engine
            .start_session(Difficulty::Easy, &mut NullSink)
            .unwrap();

        assert_eq!(engine.tick(stale, &mut NullSink), TickOutcome::Ignored);
        assert_eq!(
            engine.tick(fresh, &mut NullSink),
            TickOutcome::Counting { remaining_secs: 89 }
        );
    }

    #[test]
    fn test_same_seed_same_deck_sequence() {
        let mut engine1 = engine();
        let mut engine2 = engine();

        engine1.start_session(Difficulty::Hard, &mut NullSink).unwrap();
        engine2.start_session(Difficulty::Hard, &mut NullSink).unwrap();
        assert_eq!(engine1.session().unwrap().deck(), engine2.session().unwrap().deck());

        // Subsequent sessions differ from the first but agree across engines
        let first: Vec<_> = engine1.session().unwrap().deck().to_vec();
        engine1.start_session(Difficulty::Hard, &mut NullSink).unwrap();
        engine2.start_session(Difficulty::Hard, &mut NullSink).unwrap();
        assert_eq!(engine1.session().unwrap().deck(), engine2.session().unwrap().deck());
        assert_ne!(engine1.session().unwrap().deck(), &first[..]);
    }

    #[test]
    fn test_redeemed_token_cannot_settle_a_later_mismatch() {
        let mut engine = engine();
        engine.start_session(Difficulty::Easy, &mut NullSink).unwrap();

        let deck = engine.session().unwrap().deck();
        let other = deck
            .iter()
            .position(|token| !token.matches(&deck[0]))
            .unwrap();

        // First mismatch, settled normally.
        engine.select_card(0, &mut NullSink);
        let SelectOutcome::Mismatch(first) = engine.select_card(other, &mut NullSink) else {
            panic!("expected mismatch");
        };
        assert!(engine.settle_mismatch(first, &mut NullSink));

        // Second mismatch on the same cards. Replaying the redeemed token
        // must not settle it early.
        engine.select_card(0, &mut NullSink);
        let SelectOutcome::Mismatch(second) = engine.select_card(other, &mut NullSink) else {
            panic!("expected mismatch");
        };
        assert!(!engine.settle_mismatch(first, &mut NullSink));
        assert!(engine.session().unwrap().input_locked());
        assert_eq!(engine.session().unwrap().face_up().len(), 2);

        assert!(engine.settle_mismatch(second, &mut NullSink));
        assert!(!engine.session().unwrap().input_locked());
    }

    #[test]
    fn test_stale_revert_token_after_restart() {
        let mut engine = engine();
        engine.start_session(Difficulty::Easy, &mut NullSink).unwrap();

        // Force a mismatch: find two positions with different symbols.
        let deck = engine.session().unwrap().deck();
        let other = deck
            .iter()
            .position(|token| !token.matches(&deck[0]))
            .unwrap();

        engine.select_card(0, &mut NullSink);
        let outcome = engine.select_card(other, &mut NullSink);
        let SelectOutcome::Mismatch(token) = outcome else {
            panic!("expected mismatch, got {:?}", outcome);
        };

        // New session supersedes the pending revert.
        engine.start_session(Difficulty::Easy, &mut NullSink).unwrap();
        assert!(!engine.settle_mismatch(token, &mut NullSink));
        assert!(!engine.session().unwrap().input_locked());
    }
}
