//! Tests for position accept/reject arbitration

use chrono::{Duration, TimeZone, Utc};
use guia_core::Position;
use guia_geo::{evaluate, ArbiterConfig, Decision};

fn fix(lat: f64, lon: f64, offset_ms: i64) -> Position {
    let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    Position::new(lat, lon, 5.0, t0 + Duration::milliseconds(offset_ms))
}

fn config() -> ArbiterConfig {
    ArbiterConfig {
        time_threshold_ms: 30_000,
        distance_threshold_meters: 100.0,
    }
}

#[test]
fn test_first_fix_always_accepted() {
    let candidate = fix(-18.4696091, -43.4953982, 0);
    let decision = evaluate(&candidate, None, &config());
    assert_eq!(decision, Decision::FirstFix);
    assert!(decision.accepted());
}

#[test]
fn test_rejected_when_neither_threshold_met() {
    let last = fix(-18.4696091, -43.4953982, 0);
    // A few meters and a few seconds later.
    let candidate = fix(-18.4696300, -43.4953982, 5_000);

    let decision = evaluate(&candidate, Some(&last), &config());
    assert!(!decision.accepted());
    match decision {
        Decision::Rejected(r) => {
            assert!(r.distance_meters < 100.0);
            assert_eq!(r.elapsed_ms, 5_000);
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[test]
fn test_accepted_on_distance_threshold_alone() {
    let last = fix(-18.4696091, -43.4953982, 0);
    // ~111 m north, only one second later.
    let candidate = fix(-18.4686091, -43.4953982, 1_000);

    let decision = evaluate(&candidate, Some(&last), &config());
    assert!(decision.accepted());
    match decision {
        Decision::Accepted {
            distance_meters, ..
        } => assert!(distance_meters >= 100.0),
        other => panic!("expected accept, got {:?}", other),
    }
}

#[test]
fn test_accepted_on_elapsed_time_alone() {
    let last = fix(-18.4696091, -43.4953982, 0);
    // Same spot, 30 seconds later.
    let candidate = fix(-18.4696091, -43.4953982, 30_000);

    let decision = evaluate(&candidate, Some(&last), &config());
    assert!(decision.accepted());
}

#[test]
fn test_out_of_order_timestamp_does_not_satisfy_time_threshold() {
    let last = fix(-18.4696091, -43.4953982, 60_000);
    // Candidate is older than the last accepted fix and barely moved.
    let candidate = fix(-18.4696091, -43.4953982, 0);

    let decision = evaluate(&candidate, Some(&last), &config());
    assert!(!decision.accepted());
}

#[test]
fn test_config_validation() {
    assert!(ArbiterConfig::default().validate().is_ok());

    let bad_time = ArbiterConfig {
        time_threshold_ms: 0,
        ..ArbiterConfig::default()
    };
    assert!(bad_time.validate().is_err());

    let bad_distance = ArbiterConfig {
        distance_threshold_meters: -1.0,
        ..ArbiterConfig::default()
    };
    assert!(bad_distance.validate().is_err());
}
