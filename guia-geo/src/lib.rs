//! guia-geo: position arbitration and address change detection
//!
//! Decides when an incoming GPS fix is worth reacting to, and which
//! address fields actually changed since the last accepted fix:
//! - Great-circle distance between fixes
//! - Threshold-based accept/reject of candidate positions
//! - Per-field transition deduplication
//! - PositionTracker, the context object tying the three together

pub mod arbiter;
pub mod change;
pub mod distance;
pub mod tracker;

pub use arbiter::{evaluate, ArbiterConfig, Decision, Rejection};
pub use change::{ChangeDetails, ChangeDetector};
pub use distance::{distance_between, haversine_meters};
pub use tracker::{PositionEvent, PositionTracker};
