// src/events.rs
//
// Structured observability side-channel. State machines publish events
// after their transitions settle; nothing in the tracking logic depends
// on whether anyone drains them.

use crate::types::{LaneSide, TrackId};
use std::collections::VecDeque;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum TrackingEvent {
    /// A side locked onto a fresh candidate (not yet exposed).
    LockAcquired {
        side: LaneSide,
        track_id: TrackId,
        d_rel: f32,
    },

    /// A locked track passed its confirmation window and is now the
    /// exposed lead for its side.
    LeadConfirmed {
        side: LaneSide,
        track_id: TrackId,
        d_rel: f32,
    },

    /// The locked track missed a cycle; the lead was cleared and the
    /// tracker is coasting inside the forgiveness window.
    LeadLost {
        side: LaneSide,
        track_id: TrackId,
        lost_count: u32,
    },

    /// The forgiveness window ran out and the lock was dropped.
    LockAbandoned { side: LaneSide, track_id: TrackId },

    /// Ego speed fell below the minimum gate; both sides were cleared.
    LowSpeedCleared { v_ego: f32 },
}

pub struct EventBus {
    events: VecDeque<TrackingEvent>,
    max_pending: usize,
}

impl EventBus {
    pub fn new(max_pending: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_pending),
            max_pending,
        }
    }

    pub fn publish(&mut self, event: TrackingEvent) {
        if self.events.len() >= self.max_pending {
            warn!(
                "Event bus full ({} events), dropping oldest",
                self.max_pending
            );
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<TrackingEvent> {
        self.events.drain(..).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_bus_in_order() {
        let mut bus = EventBus::new(8);
        bus.publish(TrackingEvent::LockAcquired {
            side: LaneSide::Left,
            track_id: 4,
            d_rel: 22.0,
        });
        bus.publish(TrackingEvent::LowSpeedCleared { v_ego: 5.0 });

        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], TrackingEvent::LockAcquired { .. }));
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_overflow_drops_oldest() {
        let mut bus = EventBus::new(2);
        for v_ego in [1.0, 2.0, 3.0] {
            bus.publish(TrackingEvent::LowSpeedCleared { v_ego });
        }
        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], TrackingEvent::LowSpeedCleared { v_ego: 2.0 });
    }
}
