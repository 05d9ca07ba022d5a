//! Position snapshots delivered by the host location sensor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One immutable GPS fix.
///
/// Created from whatever the host sensor delivers and never mutated;
/// an accepted fix is superseded by the next accepted one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude in degrees, south negative.
    pub latitude: f64,
    /// Longitude in degrees, west negative.
    pub longitude: f64,
    /// Reported horizontal accuracy in meters.
    pub accuracy_meters: f64,
    /// Sensor timestamp of the fix.
    pub timestamp: DateTime<Utc>,
    /// Altitude in meters, when the sensor provides it.
    pub altitude: Option<f64>,
    /// Heading in degrees from true north, when available.
    pub heading: Option<f64>,
    /// Ground speed in meters per second, when available.
    pub speed: Option<f64>,
}

impl Position {
    /// Create a fix from the mandatory fields; optional kinematics default to `None`.
    pub fn new(latitude: f64, longitude: f64, accuracy_meters: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters,
            timestamp,
            altitude: None,
            heading: None,
            speed: None,
        }
    }

    /// Milliseconds elapsed since an earlier fix.
    ///
    /// Negative when `earlier` actually carries a later timestamp
    /// (out-of-order delivery from the sensor).
    pub fn elapsed_ms_since(&self, earlier: &Position) -> i64 {
        self.timestamp
            .signed_duration_since(earlier.timestamp)
            .num_milliseconds()
    }
}
