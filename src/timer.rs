//! Countdown tick gating.
//!
//! The engine is headless, so the host owns the actual 1 Hz scheduler and
//! calls [`MatchEngine::tick`](crate::engine::MatchEngine::tick) with the
//! [`TimerToken`] handed out at session start. Timer cancellation and
//! state mutation are not atomic on most hosts, so a tick can arrive after
//! the session it belongs to has ended. The gate makes that harmless:
//! starting a session invalidates every earlier token, stopping rejects
//! all ticks, and a stale token is discarded without touching state.

/// Proof that a tick belongs to the current countdown.
///
/// Issued by [`CountdownTimer::start`]; invalidated by the next `start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerToken {
    generation: u64,
}

/// Generation-scoped tick gate.
#[derive(Clone, Debug, Default)]
pub struct CountdownTimer {
    generation: u64,
    running: bool,
}

impl CountdownTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new countdown, invalidating all previously issued tokens.
    pub fn start(&mut self) -> TimerToken {
        self.generation += 1;
        self.running = true;
        TimerToken {
            generation: self.generation,
        }
    }

    /// Stop the countdown. Idempotent; safe to call when never started.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Is the countdown currently running?
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Should a tick carrying `token` be processed?
    #[must_use]
    pub fn accepts(&self, token: TimerToken) -> bool {
        self.running && token.generation == self.generation
    }
}

/// Format seconds as `MM:SS` for clock display.
#[must_use]
pub fn format_mm_ss(total_secs: u32) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_current_token() {
        let mut timer = CountdownTimer::new();
        let token = timer.start();
        assert!(timer.accepts(token));
    }

    #[test]
    fn test_rejects_after_stop() {
        let mut timer = CountdownTimer::new();
        let token = timer.start();
        timer.stop();
        assert!(!timer.accepts(token));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut timer = CountdownTimer::new();
        timer.stop();
        timer.stop();

        let token = timer.start();
        timer.stop();
        timer.stop();
        assert!(!timer.accepts(token));
    }

    #[test]
    fn test_restart_invalidates_old_token() {
        let mut timer = CountdownTimer::new();
        let stale = timer.start();
        let fresh = timer.start();

        assert!(!timer.accepts(stale));
        assert!(timer.accepts(fresh));
    }

    #[test]
    fn test_format_mm_ss() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(9), "00:09");
        assert_eq!(format_mm_ss(90), "01:30");
        assert_eq!(format_mm_ss(3599), "59:59");
    }
}
