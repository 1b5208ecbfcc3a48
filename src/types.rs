// src/types.rs

use serde::{Deserialize, Serialize};

/// Stable key for a physical radar detection channel. Assigned by the
/// upstream decoder; NOT identity-stable across re-acquisition (the same
/// slot may hold a different physical object after a gap).
pub type SlotId = u16;

/// Process-unique, monotonically increasing identifier tied to one
/// continuous occupancy of a slot. This is the identity anchor for
/// continuity matching.
pub type TrackId = u32;

/// One per-slot decoded record for the current cycle, as delivered by the
/// external signal decoder. `valid = false` means the slot holds no
/// detection this cycle — a normal condition, not a fault.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SlotReport {
    pub slot_id: SlotId,
    pub valid: bool,
    /// Longitudinal distance, meters, >= 0 ahead of ego.
    pub d_rel: f32,
    /// Lateral offset, meters, signed. Negative = left of ego centerline.
    pub y_rel: f32,
    /// Relative velocity, m/s. Negative = approaching ego.
    pub v_rel: f32,
    /// Relative acceleration, m/s². NaN when the sensor can't measure it.
    pub a_rel: f32,
    /// Lateral relative velocity, m/s. NaN when the sensor can't measure it.
    pub yv_rel: f32,
}

impl SlotReport {
    /// An empty (no detection) report for a slot.
    pub fn invalid(slot_id: SlotId) -> Self {
        Self {
            slot_id,
            valid: false,
            d_rel: 0.0,
            y_rel: 0.0,
            v_rel: 0.0,
            a_rel: f32::NAN,
            yv_rel: f32::NAN,
        }
    }
}

/// A live tracked object. Only constructed from valid slot reports — the
/// store evicts on invalid reports, so every `DetectionPoint` in the
/// system is measured by construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetectionPoint {
    pub slot_id: SlotId,
    pub track_id: TrackId,
    pub d_rel: f32,
    pub y_rel: f32,
    pub v_rel: f32,
    pub a_rel: f32,
    pub yv_rel: f32,
}

/// Which adjacent lane a candidate or lead belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneSide {
    Left,
    Right,
}

impl LaneSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }
}

/// Per-side vision lane-line confidence. When false for a side, radar
/// returns on that side are never promoted to candidates — suppresses
/// radar-only false lane assignment on roads without a marked line.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LaneQuality {
    pub left: bool,
    pub right: bool,
}

impl LaneQuality {
    pub fn both() -> Self {
        Self {
            left: true,
            right: true,
        }
    }

    pub fn side(&self, side: LaneSide) -> bool {
        match side {
            LaneSide::Left => self.left,
            LaneSide::Right => self.right,
        }
    }
}

/// Everything the external cycle scheduler hands us, once per cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleInput {
    pub reports: Vec<SlotReport>,
    /// Ego speed, m/s.
    pub v_ego: f32,
    pub lane_quality: LaneQuality,
}

/// Per-cycle output: the stable lead for each adjacent lane, or None when
/// no lead is confirmed on that side.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LaneLeads {
    pub left: Option<DetectionPoint>,
    pub right: Option<DetectionPoint>,
}

impl LaneLeads {
    pub fn side(&self, side: LaneSide) -> Option<&DetectionPoint> {
        match side {
            LaneSide::Left => self.left.as_ref(),
            LaneSide::Right => self.right.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_report_carries_nan_sentinels() {
        let r = SlotReport::invalid(3);
        assert!(!r.valid);
        assert!(r.a_rel.is_nan());
        assert!(r.yv_rel.is_nan());
    }

    #[test]
    fn test_cycle_input_replays_through_json() {
        // Hosts log cycle inputs for offline replay; the boundary types
        // must survive the trip.
        let input = CycleInput {
            reports: vec![SlotReport {
                slot_id: 7,
                valid: true,
                d_rel: 30.0,
                y_rel: -2.5,
                v_rel: -3.0,
                a_rel: 0.0,
                yv_rel: 0.0,
            }],
            v_ego: 22.5,
            lane_quality: LaneQuality::both(),
        };
        let json = serde_json::to_string(&input).unwrap();
        let back: CycleInput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.reports.len(), 1);
        assert_eq!(back.reports[0].slot_id, 7);
        assert_eq!(back.v_ego, 22.5);
    }

    #[test]
    fn test_lane_quality_side_lookup() {
        let q = LaneQuality {
            left: true,
            right: false,
        };
        assert!(q.side(LaneSide::Left));
        assert!(!q.side(LaneSide::Right));
    }
}
