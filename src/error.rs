//! Engine error types.
//!
//! Only configuration problems are errors: an unknown difficulty key or a
//! deck request larger than the symbol pool. Invalid input events (selecting
//! a resolved card, clicking while locked) are defined no-op guards, and
//! stale timer/settle callbacks are silently discarded - neither produces
//! an `EngineError`.

use thiserror::Error;

/// Errors surfaced synchronously at session start.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A difficulty key outside the fixed catalog enumeration.
    #[error("unknown difficulty key: {0:?}")]
    UnknownDifficulty(String),

    /// More pairs requested than the symbol pool can supply.
    #[error("pool of {available} symbols cannot supply {requested} pairs")]
    PoolTooSmall { requested: usize, available: usize },
}
