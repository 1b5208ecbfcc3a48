// src/store.rs
//
// Persistent point store keyed by radar slot. Turns raw per-cycle decoded
// values into live DetectionPoints and evicts stale ones.
//
// Identity model:
//   - slot_id is a hardware channel, reused freely by the sensor
//   - track_id is allocated once per continuous slot occupancy and never
//     reused — a slot that drops out and re-reports gets a fresh track_id
//
// There is deliberately no "stale but present" state: an invalid report
// removes the point, so downstream code never sees unmeasured data.

use crate::types::{DetectionPoint, SlotId, SlotReport, TrackId};
use std::collections::HashMap;
use tracing::debug;

pub struct DetectionStore {
    points: HashMap<SlotId, DetectionPoint>,
    next_track_id: TrackId,
}

impl DetectionStore {
    pub fn new() -> Self {
        Self {
            points: HashMap::with_capacity(32),
            next_track_id: 0,
        }
    }

    /// Apply one cycle's worth of per-slot reports.
    pub fn update(&mut self, reports: &[SlotReport]) {
        for report in reports {
            if report.valid {
                self.upsert(report);
            } else if self.points.remove(&report.slot_id).is_some() {
                debug!("Slot {} went invalid, point evicted", report.slot_id);
            }
        }
    }

    fn upsert(&mut self, report: &SlotReport) {
        let entry = self.points.entry(report.slot_id).or_insert_with(|| {
            let track_id = self.next_track_id;
            self.next_track_id += 1;
            debug!(
                "New track {} on slot {} at {:.1}m",
                track_id, report.slot_id, report.d_rel
            );
            DetectionPoint {
                slot_id: report.slot_id,
                track_id,
                d_rel: report.d_rel,
                y_rel: report.y_rel,
                v_rel: report.v_rel,
                a_rel: report.a_rel,
                yv_rel: report.yv_rel,
            }
        });
        // Kinematics refresh in place; track_id survives as long as the
        // slot keeps reporting.
        entry.d_rel = report.d_rel;
        entry.y_rel = report.y_rel;
        entry.v_rel = report.v_rel;
        entry.a_rel = report.a_rel;
        entry.yv_rel = report.yv_rel;
    }

    /// The current valid detection set. Order is not significant.
    pub fn all_points(&self) -> impl Iterator<Item = &DetectionPoint> {
        self.points.values()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl Default for DetectionStore {
    fn default() -> Self {
        Self::new()
    }
}
