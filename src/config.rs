// src/config.rs

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

/// All deployment constants in one place. Loaded once at startup; nothing
/// here is re-tunable mid-run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Distance from ego centerline to the edge of ego's own lane, m.
    /// Points inside this band are same-lane and never adjacent candidates.
    pub lane_boundary: f32,
    /// Maximum lateral offset considered an adjacent lane, m. Beyond this
    /// is roadside clutter (barriers, signs, shoulders).
    pub max_lateral: f32,
    /// Sanity floor on longitudinal distance, m.
    pub min_distance: f32,
    /// Sanity ceiling on longitudinal distance, m.
    pub max_distance: f32,
    /// Ego speed above which we count as "moving" for the velocity
    /// plausibility gate, m/s.
    pub ego_moving_speed: f32,
    /// While moving: minimum |v_rel| for a return to count as a vehicle
    /// rather than a wall/barrier, m/s.
    pub moving_v_rel_min: f32,
    /// While stopped: a return must recede at least this fast (v_rel at or
    /// below this value) to be trusted as a passing vehicle, m/s.
    pub stopped_v_rel_max: f32,
    /// Below this ego speed both leads are cleared entirely — low-speed
    /// geometry is too ambiguous to trust, m/s.
    pub min_speed: f32,
    /// Consecutive matched cycles before a locked track is exposed as lead.
    pub min_track_count: u32,
    /// Consecutive missed cycles a lock survives before re-acquisition.
    pub max_lost_count: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            lane_boundary: 1.8,    // ~3.6m lane width, ±1.8m from center
            max_lateral: 4.5,      // Tight: excludes shoulders
            min_distance: 0.75,
            max_distance: 200.0,
            ego_moving_speed: 1.0,
            moving_v_rel_min: 1.0,
            stopped_v_rel_max: -7.0, // Receding at >= 25 km/h
            min_speed: 8.94,         // 20 mph
            min_track_count: 5,      // 0.5s of stability at 10Hz
            max_lost_count: 10,      // Forgive up to 1s of dropout
        }
    }
}

impl TrackerConfig {
    /// Wide-lane deployment variant — relaxed lateral ceiling for highways
    /// with wide adjacent lanes, at the cost of occasionally admitting
    /// shoulder traffic.
    pub fn wide_lanes() -> Self {
        Self {
            max_lateral: 5.5,
            ..Self::default()
        }
    }

    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: TrackerConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}
