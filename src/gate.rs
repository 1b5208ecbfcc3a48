// src/gate.rs
//
// Lane admissibility filter. Classifies live detection points into left
// and right adjacent-lane candidate sets, or drops them.
//
// Gate order (a point is dropped at its first failure):
//   1. Distance sanity — outside [min_distance, max_distance] is a glitch
//   2. Lateral band — inside lane_boundary is ego's own lane, beyond
//      max_lateral is roadside clutter; both bounds strict
//   3. Velocity plausibility — the key anti-false-positive gate:
//        moving:  |v_rel| near zero means wall/barrier, drop
//        stopped: only a fast-receding return is a trusted passing car
//   4. Side assignment, suppressed when vision has no lane line there
//
// The two output sets are disjoint by construction: a point's y_rel sign
// assigns it to exactly one side.

use crate::config::TrackerConfig;
use crate::types::{DetectionPoint, LaneQuality};
use tracing::debug;

/// Disjoint per-side candidate sets for one cycle.
#[derive(Debug, Clone, Default)]
pub struct LaneCandidates {
    pub left: Vec<DetectionPoint>,
    pub right: Vec<DetectionPoint>,
}

impl LaneCandidates {
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

pub struct LaneGate {
    config: TrackerConfig,
}

impl LaneGate {
    pub fn new(config: TrackerConfig) -> Self {
        Self { config }
    }

    /// True when ego is too slow for adjacent-lane geometry to be trusted
    /// at all. The caller clears both leads for such cycles.
    pub fn below_min_speed(&self, v_ego: f32) -> bool {
        v_ego < self.config.min_speed
    }

    /// Classify one cycle's detection set. Points failing any gate are
    /// silently dropped — degraded input degrades to "no candidate",
    /// never to an error.
    pub fn classify<'a>(
        &self,
        points: impl Iterator<Item = &'a DetectionPoint>,
        v_ego: f32,
        lane_quality: LaneQuality,
    ) -> LaneCandidates {
        let mut candidates = LaneCandidates::default();
        let cfg = &self.config;

        if self.below_min_speed(v_ego) {
            return candidates;
        }

        for pt in points {
            // Distance sanity. NaN fails both comparisons, so malformed
            // records fall out here rather than propagating.
            if !(pt.d_rel >= cfg.min_distance && pt.d_rel <= cfg.max_distance) {
                continue;
            }

            // Lateral band, strict on both bounds: a point exactly on the
            // lane boundary belongs to neither set.
            let lateral = pt.y_rel.abs();
            if !(lateral > cfg.lane_boundary && lateral < cfg.max_lateral) {
                continue;
            }

            if v_ego > cfg.ego_moving_speed {
                // Moving: a near-zero relative velocity at road speed is a
                // stationary object (wall, barrier, parked car), not a
                // lane-mate.
                if pt.v_rel.abs() < cfg.moving_v_rel_min {
                    continue;
                }
            } else {
                // Stopped: every stationary object has a stable track and
                // zero v_rel, and slow/approaching returns are ambiguous.
                // Only a return receding at speed is trusted.
                if !(pt.v_rel <= cfg.stopped_v_rel_max) {
                    continue;
                }
            }

            if pt.y_rel < 0.0 {
                if lane_quality.left {
                    candidates.left.push(*pt);
                }
            } else if lane_quality.right {
                candidates.right.push(*pt);
            }
        }

        debug!(
            "Gate: {} left / {} right candidates at v_ego={:.1}",
            candidates.left.len(),
            candidates.right.len(),
            v_ego
        );
        candidates
    }
}
