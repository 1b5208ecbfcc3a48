// src/pipeline.rs
//
// Cycle driver. Owns the store, the gate, the two continuity trackers
// and the event bus, and sequences them once per sensor cycle:
//
//   SlotReports → DetectionStore → LaneGate → ContinuityTracker×2 → LaneLeads
//
// No algorithmic logic lives here — any scheduling harness can replace
// the caller. Single-threaded by contract: the host hands over a full
// immutable report snapshot per cycle, so no locking anywhere.

use crate::config::TrackerConfig;
use crate::continuity::ContinuityTracker;
use crate::events::{EventBus, TrackingEvent};
use crate::gate::LaneGate;
use crate::store::DetectionStore;
use crate::types::{CycleInput, DetectionPoint, LaneLeads, LaneSide};
use tracing::debug;

/// Plain per-process counters. Single-threaded model, so no atomics.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleStats {
    pub cycles: u64,
    pub low_speed_cycles: u64,
    pub left_lead_cycles: u64,
    pub right_lead_cycles: u64,
}

pub struct AdjacentLaneTracker {
    store: DetectionStore,
    gate: LaneGate,
    left: ContinuityTracker,
    right: ContinuityTracker,
    events: EventBus,
    stats: CycleStats,
}

impl AdjacentLaneTracker {
    pub fn new(config: TrackerConfig) -> Self {
        let left = ContinuityTracker::new(
            LaneSide::Left,
            config.min_track_count,
            config.max_lost_count,
        );
        let right = ContinuityTracker::new(
            LaneSide::Right,
            config.min_track_count,
            config.max_lost_count,
        );
        Self {
            store: DetectionStore::new(),
            gate: LaneGate::new(config),
            left,
            right,
            events: EventBus::new(64),
            stats: CycleStats::default(),
        }
    }

    /// One full pass: decode → gate → track. Never blocks, never fails;
    /// zero detections is the empty-candidate case, not an error.
    pub fn run_cycle(&mut self, input: &CycleInput) -> LaneLeads {
        self.stats.cycles += 1;
        self.store.update(&input.reports);

        if self.gate.below_min_speed(input.v_ego) {
            self.stats.low_speed_cycles += 1;
            let had_state =
                self.left.locked_track_id().is_some() || self.right.locked_track_id().is_some();
            self.left.clear();
            self.right.clear();
            if had_state {
                self.events.publish(TrackingEvent::LowSpeedCleared {
                    v_ego: input.v_ego,
                });
            }
            debug!("Below minimum speed ({:.1} m/s), leads cleared", input.v_ego);
            return LaneLeads::default();
        }

        let candidates =
            self.gate
                .classify(self.store.all_points(), input.v_ego, input.lane_quality);

        let left = run_side(&mut self.left, &candidates.left, &mut self.events);
        let right = run_side(&mut self.right, &candidates.right, &mut self.events);

        if left.is_some() {
            self.stats.left_lead_cycles += 1;
        }
        if right.is_some() {
            self.stats.right_lead_cycles += 1;
        }

        LaneLeads { left, right }
    }

    /// Events published since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<TrackingEvent> {
        self.events.drain()
    }

    pub fn store(&self) -> &DetectionStore {
        &self.store
    }

    pub fn left(&self) -> &ContinuityTracker {
        &self.left
    }

    pub fn right(&self) -> &ContinuityTracker {
        &self.right
    }

    pub fn stats(&self) -> CycleStats {
        self.stats
    }
}

/// Run one side's continuity update and derive events by diffing the
/// tracker state around it. The transition logic itself never touches
/// the bus.
fn run_side(
    tracker: &mut ContinuityTracker,
    candidates: &[DetectionPoint],
    events: &mut EventBus,
) -> Option<DetectionPoint> {
    let side = tracker.side();
    let pre_lock = tracker.locked_track_id();
    let pre_lead = tracker.lead().is_some();

    let lead = tracker.update(candidates).copied();
    let post_lock = tracker.locked_track_id();

    if pre_lock != post_lock {
        if let Some(old_id) = pre_lock {
            events.publish(TrackingEvent::LockAbandoned {
                side,
                track_id: old_id,
            });
        }
        if let Some(new_id) = post_lock {
            let d_rel = candidates
                .iter()
                .find(|pt| pt.track_id == new_id)
                .map(|pt| pt.d_rel)
                .unwrap_or(f32::NAN);
            events.publish(TrackingEvent::LockAcquired {
                side,
                track_id: new_id,
                d_rel,
            });
        }
    }

    match (&lead, pre_lead) {
        (Some(pt), false) => events.publish(TrackingEvent::LeadConfirmed {
            side,
            track_id: pt.track_id,
            d_rel: pt.d_rel,
        }),
        (None, true) => {
            // Covers both coasting and abandonment: the lead went away
            // this cycle either way.
            if let Some(track_id) = pre_lock {
                events.publish(TrackingEvent::LeadLost {
                    side,
                    track_id,
                    lost_count: tracker.lost_count(),
                });
            }
        }
        _ => {}
    }

    lead
}
