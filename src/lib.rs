// src/lib.rs
//
// Adjacent-lane lead tracking from noisy radar detections.
//
// Signal flow, once per sensor cycle:
//   SlotReports → store (upsert/evict) ─→ gate (classify) ─→ continuity ×2 → LaneLeads
//
// The hard problem is temporal identity: detections appear, disappear and
// flicker every cycle, and the exposed lead per lane side must not. The
// store anchors identity (monotonic track_ids per slot occupancy), the
// gate rejects clutter and wrong-lane returns, and the per-side
// continuity trackers add confirmation/forgiveness hysteresis so a lead
// is only ever shown once it is stable.
//
// Orchestrated by pipeline::AdjacentLaneTracker; wire decoding and lane
// perception are external collaborators.

pub mod config;
pub mod continuity;
pub mod events;
pub mod gate;
pub mod pipeline;
pub mod store;
pub mod types;

// Re-exports for ergonomic access from host code
pub use config::TrackerConfig;
pub use continuity::{ContinuityTracker, TrackPhase};
pub use events::{EventBus, TrackingEvent};
pub use gate::{LaneCandidates, LaneGate};
pub use pipeline::{AdjacentLaneTracker, CycleStats};
pub use store::DetectionStore;
pub use types::{
    CycleInput, DetectionPoint, LaneLeads, LaneQuality, LaneSide, SlotId, SlotReport, TrackId,
};
