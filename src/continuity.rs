// src/continuity.rs
//
// Identity-continuity hysteresis for one lane side. Locks onto a single
// track_id, requires min_track_count consecutive confirmations before
// exposing it as the lead, and forgives up to max_lost_count consecutive
// misses before abandoning the lock and re-acquiring.
//
// Naive closest-point-per-cycle selection flickers between nearby
// vehicles and briefly-glimpsed clutter. The confirmation window trades
// ~0.5s of display latency for a lead that never flickers; the
// forgiveness window rides out short radar dropouts without losing
// identity. This output is advisory/display-only — never an actuation
// input.
//
// One implementation, instantiated once per side. The candidate set
// handed in is already side-filtered, so a track locked here can never
// be matched against the other side's returns.

use crate::types::{DetectionPoint, LaneSide, TrackId};
use tracing::{debug, info};

/// Where the tracker currently is in its lock lifecycle. Derived from
/// the counters; useful for observability and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackPhase {
    /// No lock held, nothing being evaluated.
    Unlocked,
    /// Locked, still accumulating confirmations; lead not yet exposed.
    Acquiring,
    /// Locked and confirmed; lead exposed while matches continue.
    Confirmed,
    /// Locked but missed this cycle; waiting inside the forgiveness
    /// window. Lead is never exposed while coasting.
    Coasting,
}

pub struct ContinuityTracker {
    side: LaneSide,
    min_track_count: u32,
    max_lost_count: u32,

    locked_track_id: Option<TrackId>,
    confirm_count: u32,
    lost_count: u32,
    lead: Option<DetectionPoint>,
}

impl ContinuityTracker {
    pub fn new(side: LaneSide, min_track_count: u32, max_lost_count: u32) -> Self {
        Self {
            side,
            min_track_count,
            max_lost_count,
            locked_track_id: None,
            confirm_count: 0,
            lost_count: 0,
            lead: None,
        }
    }

    /// Evaluate one cycle against this side's candidate set. Returns the
    /// exposed lead, which is always a point from THIS cycle's candidates
    /// matching the locked id — never stale, never borrowed cross-side.
    pub fn update(&mut self, candidates: &[DetectionPoint]) -> Option<&DetectionPoint> {
        match self.locked_track_id {
            Some(locked_id) => {
                let matched = candidates.iter().find(|pt| pt.track_id == locked_id);
                match matched {
                    Some(pt) => {
                        // A match inside the forgiveness window keeps the
                        // accumulated confirmations — reappearance does not
                        // restart the confirmation clock.
                        self.lost_count = 0;
                        self.confirm_count += 1;
                        if self.confirm_count >= self.min_track_count {
                            if self.lead.is_none() {
                                info!(
                                    "[{}] Track {} confirmed after {} cycles at {:.1}m",
                                    self.side.as_str(),
                                    locked_id,
                                    self.confirm_count,
                                    pt.d_rel
                                );
                            }
                            self.lead = Some(*pt);
                        } else {
                            // Still building confidence.
                            self.lead = None;
                        }
                    }
                    None => {
                        // Clear immediately — the lead must never show a
                        // value from a prior cycle.
                        self.lead = None;
                        self.lost_count += 1;
                        if self.lost_count > self.max_lost_count {
                            info!(
                                "[{}] Track {} abandoned after {} misses",
                                self.side.as_str(),
                                locked_id,
                                self.lost_count
                            );
                            self.acquire(candidates);
                        } else {
                            debug!(
                                "[{}] Track {} coasting ({}/{})",
                                self.side.as_str(),
                                locked_id,
                                self.lost_count,
                                self.max_lost_count
                            );
                        }
                    }
                }
            }
            None => self.acquire(candidates),
        }
        self.lead.as_ref()
    }

    /// Lock onto the nearest candidate, or go unlocked if there is none.
    /// Acquisition counts as the first confirmation; the lead stays
    /// hidden until min_track_count is reached.
    fn acquire(&mut self, candidates: &[DetectionPoint]) {
        let nearest = candidates.iter().min_by(|a, b| {
            a.d_rel
                .partial_cmp(&b.d_rel)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.track_id.cmp(&b.track_id))
        });

        match nearest {
            Some(pt) => {
                debug!(
                    "[{}] Acquiring track {} at {:.1}m",
                    self.side.as_str(),
                    pt.track_id,
                    pt.d_rel
                );
                self.locked_track_id = Some(pt.track_id);
                self.confirm_count = 1;
                self.lost_count = 0;
                self.lead = None;
            }
            None => {
                self.locked_track_id = None;
                self.confirm_count = 0;
                self.lost_count = 0;
                self.lead = None;
            }
        }
    }

    /// Drop all state. Used when the whole subsystem is gated off
    /// (low-speed clear) so a later re-entry starts from scratch.
    pub fn clear(&mut self) {
        self.locked_track_id = None;
        self.confirm_count = 0;
        self.lost_count = 0;
        self.lead = None;
    }

    pub fn phase(&self) -> TrackPhase {
        match self.locked_track_id {
            None => TrackPhase::Unlocked,
            Some(_) if self.lost_count > 0 => TrackPhase::Coasting,
            Some(_) if self.confirm_count >= self.min_track_count => TrackPhase::Confirmed,
            Some(_) => TrackPhase::Acquiring,
        }
    }

    pub fn side(&self) -> LaneSide {
        self.side
    }

    pub fn locked_track_id(&self) -> Option<TrackId> {
        self.locked_track_id
    }

    pub fn lost_count(&self) -> u32 {
        self.lost_count
    }

    pub fn lead(&self) -> Option<&DetectionPoint> {
        self.lead.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN_TRACK: u32 = 5;
    const MAX_LOST: u32 = 10;

    fn tracker() -> ContinuityTracker {
        ContinuityTracker::new(LaneSide::Left, MIN_TRACK, MAX_LOST)
    }

    fn pt(track_id: u32, d_rel: f32) -> DetectionPoint {
        DetectionPoint {
            slot_id: track_id as u16,
            track_id,
            d_rel,
            y_rel: -2.5,
            v_rel: -3.0,
            a_rel: f32::NAN,
            yv_rel: f32::NAN,
        }
    }

    #[test]
    fn test_empty_set_stays_unlocked() {
        let mut t = tracker();
        assert!(t.update(&[]).is_none());
        assert_eq!(t.phase(), TrackPhase::Unlocked);
        assert!(t.locked_track_id().is_none());
    }

    #[test]
    fn test_lead_exposed_after_exactly_min_track_count_cycles() {
        // Scenario A: two left candidates, nearest is id=2 at 30m.
        let candidates = vec![pt(2, 30.0), pt(3, 70.0)];
        let mut t = tracker();

        for cycle in 1..MIN_TRACK {
            assert!(
                t.update(&candidates).is_none(),
                "lead must stay hidden on cycle {cycle}"
            );
            assert_eq!(t.phase(), TrackPhase::Acquiring);
        }
        let lead = t.update(&candidates).copied();
        assert_eq!(lead.map(|l| l.track_id), Some(2));
        assert_eq!(t.phase(), TrackPhase::Confirmed);
    }

    #[test]
    fn test_nearest_wins_acquisition() {
        let mut t = tracker();
        t.update(&[pt(7, 80.0), pt(4, 12.0), pt(9, 45.0)]);
        assert_eq!(t.locked_track_id(), Some(4));
    }

    #[test]
    fn test_equal_distance_tie_breaks_to_lowest_track_id() {
        let mut t = tracker();
        t.update(&[pt(8, 25.0), pt(3, 25.0)]);
        assert_eq!(t.locked_track_id(), Some(3));
    }

    #[test]
    fn test_lead_clears_immediately_on_miss() {
        let candidates = vec![pt(2, 30.0)];
        let mut t = tracker();
        for _ in 0..MIN_TRACK {
            t.update(&candidates);
        }
        assert!(t.lead().is_some());

        // Miss cycle: cleared NOW, not after a delay.
        assert!(t.update(&[]).is_none());
        assert_eq!(t.phase(), TrackPhase::Coasting);
        assert_eq!(t.locked_track_id(), Some(2));
    }

    #[test]
    fn test_lock_survives_max_lost_count_misses() {
        let candidates = vec![pt(2, 30.0)];
        let mut t = tracker();
        for _ in 0..MIN_TRACK {
            t.update(&candidates);
        }

        for miss in 1..=MAX_LOST {
            t.update(&[]);
            assert_eq!(
                t.locked_track_id(),
                Some(2),
                "lock must survive miss {miss}"
            );
        }
        // Miss number MAX_LOST + 1 abandons the lock. With no candidates
        // available the tracker goes unlocked in the same cycle.
        t.update(&[]);
        assert_eq!(t.phase(), TrackPhase::Unlocked);
    }

    #[test]
    fn test_reappearance_inside_window_needs_no_reconfirmation() {
        // Scenario B: confirmed for 5 cycles, gone for 10, back on the
        // 11th evaluation after the gap started. lost_count resets, the
        // accumulated confirmations stand, and the lead shows immediately.
        let candidates = vec![pt(2, 30.0)];
        let mut t = tracker();
        for _ in 0..MIN_TRACK {
            t.update(&candidates);
        }

        for _ in 0..MAX_LOST {
            assert!(t.update(&[]).is_none());
        }
        assert_eq!(t.phase(), TrackPhase::Coasting);

        let lead = t.update(&candidates).copied();
        assert_eq!(lead.map(|l| l.track_id), Some(2));
        assert_eq!(t.phase(), TrackPhase::Confirmed);
    }

    #[test]
    fn test_abandon_reacquires_in_same_cycle() {
        let mut t = tracker();
        for _ in 0..MIN_TRACK {
            t.update(&[pt(2, 30.0)]);
        }
        // Track 2 vanishes; track 5 is present throughout the gap.
        let other = vec![pt(5, 40.0)];
        for _ in 0..MAX_LOST {
            assert!(t.update(&other).is_none());
            assert_eq!(t.locked_track_id(), Some(2));
        }
        // Abandonment cycle: lock moves to track 5 immediately, but it
        // must start unconfirmed.
        assert!(t.update(&other).is_none());
        assert_eq!(t.locked_track_id(), Some(5));
        assert_eq!(t.phase(), TrackPhase::Acquiring);

        // Fresh confirmation window applies to the new lock.
        for _ in 0..MIN_TRACK - 2 {
            assert!(t.update(&other).is_none());
        }
        assert_eq!(t.update(&other).map(|l| l.track_id), Some(5));
    }

    #[test]
    fn test_exposed_lead_tracks_current_cycle_kinematics() {
        let mut t = tracker();
        for _ in 0..MIN_TRACK {
            t.update(&[pt(2, 30.0)]);
        }
        // Same identity, new distance: the exposed point is this cycle's.
        let lead = t.update(&[pt(2, 27.5)]).copied();
        assert_eq!(lead.map(|l| l.d_rel), Some(27.5));
    }

    #[test]
    fn test_closer_newcomer_does_not_steal_lock() {
        // The whole point of hysteresis: a briefly-glimpsed nearer return
        // must not displace a held lock while the lock keeps matching.
        let mut t = tracker();
        for _ in 0..MIN_TRACK {
            t.update(&[pt(2, 30.0)]);
        }
        let lead = t.update(&[pt(2, 30.0), pt(9, 10.0)]).copied();
        assert_eq!(lead.map(|l| l.track_id), Some(2));
        assert_eq!(t.locked_track_id(), Some(2));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut t = tracker();
        for _ in 0..MIN_TRACK {
            t.update(&[pt(2, 30.0)]);
        }
        t.clear();
        assert_eq!(t.phase(), TrackPhase::Unlocked);
        assert!(t.lead().is_none());
        assert!(t.locked_track_id().is_none());
    }
}
