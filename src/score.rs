//! Scoring.
//!
//! A pure function of the session counters: every move, elapsed second,
//! and mismatch eats into a fixed base. Deterministic, floored at zero.
//! The same function drives the final result and the running HUD score.

/// Starting score before penalties.
pub const BASE_SCORE: i64 = 1000;

/// Penalty per move.
pub const MOVE_PENALTY: i64 = 10;

/// Penalty per elapsed second.
pub const TIME_PENALTY: i64 = 2;

/// Penalty per mismatch, scaled by the level's mismatch penalty weight.
pub const MISMATCH_PENALTY: i64 = 5;

/// Compute the score for a session.
///
/// `score = max(0, 1000 - 10*moves - 2*elapsed - 5*weight*mismatches)`.
/// Monotonically non-increasing in every argument.
#[must_use]
pub fn compute(moves: u32, elapsed_secs: u32, mismatches: u32, mismatch_penalty_weight: u32) -> u32 {
    // i128 keeps the sum exact even at u32::MAX counters; the weighted
    // mismatch term alone can exceed i64.
    let penalties = i128::from(MOVE_PENALTY) * i128::from(moves)
        + i128::from(TIME_PENALTY) * i128::from(elapsed_secs)
        + i128::from(MISMATCH_PENALTY)
            * i128::from(mismatch_penalty_weight)
            * i128::from(mismatches);

    (i128::from(BASE_SCORE) - penalties).max(0) as u32
}
