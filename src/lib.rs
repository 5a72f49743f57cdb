//! # pairdown
//!
//! A headless engine for turn-based memory-matching card games played
//! against a countdown.
//!
//! ## Design Principles
//!
//! 1. **Headless**: No rendering, DOM, or input wiring. Hosts select
//!    cards by index and subscribe to [`EngineEvent`] notifications;
//!    views are purely derived and never queried back for state.
//!
//! 2. **Single Owned Session**: One [`SessionState`] value, owned by the
//!    engine and replaced wholesale on every start. All invariants are
//!    enforced in one place instead of scattered call sites.
//!
//! 3. **Token-Scoped Deferral**: The two sources of deferred execution -
//!    the 1 Hz countdown tick and the mismatch settle callback - carry
//!    tokens scoped to the session that issued them. A late callback from
//!    a superseded session is discarded, never applied.
//!
//! ## Architecture
//!
//! - Deterministic decks: ChaCha8-seeded double Fisher-Yates shuffle,
//!   forked per session so replays are reproducible from one seed.
//! - Pure scoring: score is a function of (moves, elapsed, mismatches)
//!   and the difficulty's penalty weight, floored at zero.
//! - Pluggable persistence: best scores go through the [`ScoreStorage`]
//!   key-value trait; in-memory and JSON-file backends are provided.
//!
//! ## Modules
//!
//! - `levels`: Difficulty presets (pairs, grid, time budget, penalties)
//! - `cards`: Card tokens and the symbol pool
//! - `rng`: Deterministic RNG with per-session forking
//! - `deck`: Shuffled deck construction
//! - `session`: The per-game state machine data
//! - `engine`: The match engine driving it all
//! - `timer`: Countdown tick gating
//! - `score`: Pure scoring function
//! - `best`: Best-score persistence
//! - `events`: Outbound notifications and sinks

pub mod best;
pub mod cards;
pub mod deck;
pub mod engine;
pub mod error;
pub mod events;
pub mod levels;
pub mod rng;
pub mod score;
pub mod session;
pub mod timer;

// Re-export commonly used types
pub use crate::best::{BestScores, JsonFileStorage, MemoryStorage, SaveOutcome, ScoreStorage};
pub use crate::cards::{CardToken, SymbolDef, SYMBOL_POOL};
pub use crate::engine::{MatchEngine, RevertToken, SelectOutcome, TickOutcome, SETTLE_DELAY_MS};
pub use crate::error::EngineError;
pub use crate::events::{EngineEvent, EventLog, EventSink, NullSink, WinSummary};
pub use crate::levels::{Difficulty, LevelConfig};
pub use crate::rng::GameRng;
pub use crate::session::{CardState, EndReason, SessionState, SessionStatus};
pub use crate::timer::{format_mm_ss, CountdownTimer, TimerToken};
