//! Outbound engine notifications.
//!
//! The engine is headless: rendering, announcements, and HUD widgets are
//! host collaborators that subscribe to [`EngineEvent`]s. Events are
//! fire-and-forget - the engine never queries a collaborator back for
//! state, so views stay purely derived.

use serde::{Deserialize, Serialize};

use crate::levels::Difficulty;

/// Summary attached to a won session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinSummary {
    pub moves: u32,
    pub mismatches: u32,
    pub elapsed_secs: u32,
    pub score: u32,
    /// Did this score replace the stored best for the difficulty?
    pub is_new_best: bool,
}

/// Notifications emitted on state transitions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A new session began.
    SessionStarted {
        difficulty: Difficulty,
        time_budget_secs: u32,
    },

    /// A card turned face-up.
    CardFlipped { position: usize },

    /// A mismatched pair settled back face-down.
    CardsReverted { positions: [usize; 2] },

    /// A matching pair resolved.
    PairResolved {
        positions: [usize; 2],
        symbol_key: String,
    },

    /// All pairs resolved before the clock ran out.
    SessionWon(WinSummary),

    /// The countdown expired with pairs still hidden.
    SessionTimedOut {
        resolved_pairs: usize,
        pair_count: usize,
    },

    /// Counters for HUD display; fired on start and after each move.
    HudUpdate {
        moves: u32,
        resolved_pairs: usize,
        pair_count: usize,
        score: u32,
    },
}

/// Consumer of engine notifications.
///
/// No return value is expected; sinks must not call back into the engine.
pub trait EventSink {
    fn on_event(&mut self, event: &EngineEvent);
}

/// Sink that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&mut self, _event: &EngineEvent) {}
}

/// Sink that records events in order.
///
/// Useful for tests and for hosts that drain notifications once per frame.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<EngineEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Count events matching a predicate.
    pub fn count_matching(&self, pred: impl Fn(&EngineEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    /// Remove and return all recorded events.
    pub fn drain(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for EventLog {
    fn on_event(&mut self, event: &EngineEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_records_in_order() {
        let mut log = EventLog::new();
        log.on_event(&EngineEvent::CardFlipped { position: 3 });
        log.on_event(&EngineEvent::CardFlipped { position: 5 });

        assert_eq!(
            log.events(),
            &[
                EngineEvent::CardFlipped { position: 3 },
                EngineEvent::CardFlipped { position: 5 },
            ]
        );
    }

    #[test]
    fn test_event_log_count_and_drain() {
        let mut log = EventLog::new();
        log.on_event(&EngineEvent::CardFlipped { position: 0 });
        log.on_event(&EngineEvent::CardsReverted { positions: [0, 1] });

        let flips = log.count_matching(|e| matches!(e, EngineEvent::CardFlipped { .. }));
        assert_eq!(flips, 1);

        assert_eq!(log.drain().len(), 2);
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_event_serialization() {
        let event = EngineEvent::SessionWon(WinSummary {
            moves: 8,
            mismatches: 2,
            elapsed_secs: 41,
            score: 828,
            is_new_best: true,
        });

        let json = serde_json::to_string(&event).unwrap();
        let back: EngineEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
