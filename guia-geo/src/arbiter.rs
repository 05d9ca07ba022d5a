//! Accept/reject arbitration for incoming position fixes

use crate::distance::distance_between;
use guia_core::Position;
use serde::{Deserialize, Serialize};

/// Thresholds controlling when a candidate fix supersedes the last
/// accepted one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    /// Minimum elapsed time since the last accepted fix, in milliseconds.
    pub time_threshold_ms: i64,

    /// Minimum great-circle distance from the last accepted fix, in meters.
    pub distance_threshold_meters: f64,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            time_threshold_ms: 30_000,
            distance_threshold_meters: 50.0,
        }
    }
}

impl ArbiterConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.time_threshold_ms <= 0 {
            return Err("Time threshold must be greater than 0 ms".to_string());
        }

        if self.distance_threshold_meters <= 0.0 || !self.distance_threshold_meters.is_finite() {
            return Err("Distance threshold must be a positive number of meters".to_string());
        }

        Ok(())
    }
}

/// Outcome of arbitrating one candidate fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// No previously accepted fix existed; accepted unconditionally.
    FirstFix,
    /// A threshold was met; the candidate supersedes the last fix.
    Accepted {
        distance_meters: f64,
        elapsed_ms: i64,
    },
    /// Neither threshold met; the candidate is discarded.
    Rejected(Rejection),
}

/// Measurements behind a rejection, kept for UI feedback and logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rejection {
    pub distance_meters: f64,
    pub elapsed_ms: i64,
}

impl Decision {
    pub fn accepted(&self) -> bool {
        !matches!(self, Decision::Rejected(_))
    }
}

/// Decide whether a candidate fix should replace the last accepted one.
///
/// A pure predicate over the two snapshots and the thresholds: the first
/// fix is always accepted; afterwards a candidate is accepted when enough
/// time has passed **or** it is far enough away. Rejection has no side
/// effects. A candidate whose timestamp precedes the last accepted fix
/// never satisfies the time threshold.
pub fn evaluate(
    candidate: &Position,
    last_accepted: Option<&Position>,
    config: &ArbiterConfig,
) -> Decision {
    let last = match last_accepted {
        Some(last) => last,
        None => return Decision::FirstFix,
    };

    let distance_meters = distance_between(candidate, last);
    let elapsed_ms = candidate.elapsed_ms_since(last);

    if elapsed_ms >= config.time_threshold_ms || distance_meters >= config.distance_threshold_meters
    {
        Decision::Accepted {
            distance_meters,
            elapsed_ms,
        }
    } else {
        Decision::Rejected(Rejection {
            distance_meters,
            elapsed_ms,
        })
    }
}
