//! Great-circle distance between geographic coordinates

use guia_core::Position;
use std::f64::consts::PI;

/// Mean Earth radius in meters, as used by the haversine formula.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance between two lat/lon pairs.
///
/// # Arguments
///
/// * `lat1`, `lon1` - First point, degrees
/// * `lat2`, `lon2` - Second point, degrees
///
/// # Returns
///
/// Distance along the great circle, in meters.
#[inline]
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1 * PI / 180.0;
    let lat2_rad = lat2 * PI / 180.0;
    let dlat = (lat2 - lat1) * PI / 180.0;
    let dlon = (lon2 - lon1) * PI / 180.0;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_METERS * c
}

/// Distance in meters between two position fixes.
#[inline]
pub fn distance_between(a: &Position, b: &Position) -> f64 {
    haversine_meters(a.latitude, a.longitude, b.latitude, b.longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance_for_identical_points() {
        let d = haversine_meters(-18.4696091, -43.4953982, -18.4696091, -43.4953982);
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn test_sao_paulo_to_rio() {
        // São Paulo (-23.5505, -46.6333) to Rio de Janeiro (-22.9068, -43.1729)
        // is roughly 361 km along the great circle.
        let d = haversine_meters(-23.5505, -46.6333, -22.9068, -43.1729);
        assert!((d - 361_000.0).abs() < 5_000.0, "got {} m", d);
    }

    #[test]
    fn test_small_step_near_milho_verde() {
        // 0.001 degrees of latitude is about 111 meters anywhere on Earth.
        let d = haversine_meters(-18.4696091, -43.4953982, -18.4686091, -43.4953982);
        assert!((d - 111.0).abs() < 2.0, "got {} m", d);
    }

    #[test]
    fn test_symmetry() {
        let ab = haversine_meters(-18.4696, -43.4954, -18.6052, -43.3799);
        let ba = haversine_meters(-18.6052, -43.3799, -18.4696, -43.4954);
        assert!((ab - ba).abs() < 1e-6);
    }
}
