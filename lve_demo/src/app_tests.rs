//! Tests for the loop helpers and config overrides

use std::time::Duration;
use lve_engine::lve::Error;
use lve_engine::lve::render::Config;
use super::*;

#[test]
fn test_frame_time_is_clamped() {
    assert!((clamp_frame_time(Duration::from_millis(16)) - 0.016).abs() < 1e-6);
    assert_eq!(clamp_frame_time(Duration::from_secs(3)), MAX_FRAME_TIME);
}

#[test]
fn test_no_overrides_keeps_defaults() {
    let config = apply_overrides(Config::default(), None, None).unwrap();
    assert_eq!(config.max_frames_in_flight, Config::default().max_frames_in_flight);
    assert_eq!(config.enable_validation, Config::default().enable_validation);
}

#[test]
fn test_validation_override() {
    assert!(apply_overrides(Config::default(), Some("1"), None).unwrap().enable_validation);
    assert!(!apply_overrides(Config::default(), Some(" off "), None).unwrap().enable_validation);
    assert!(matches!(
        apply_overrides(Config::default(), Some("maybe"), None),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn test_frames_in_flight_override() {
    let config = apply_overrides(Config::default(), None, Some("3")).unwrap();
    assert_eq!(config.max_frames_in_flight, 3);
}

#[test]
fn test_frames_in_flight_override_is_validated() {
    assert!(matches!(apply_overrides(Config::default(), None, Some("0")), Err(Error::InvalidConfig(_))));
    assert!(matches!(apply_overrides(Config::default(), None, Some("4")), Err(Error::InvalidConfig(_))));
    assert!(matches!(apply_overrides(Config::default(), None, Some("two")), Err(Error::InvalidConfig(_))));
}

#[test]
fn test_missing_shader_points_to_compile_script() {
    match load_shader("does_not_exist.vert.spv") {
        Err(Error::InitializationFailed(message)) => {
            assert!(message.contains("does_not_exist.vert.spv"), "{}", message);
            assert!(message.contains("compile.sh"), "{}", message);
        }
        other => panic!("expected InitializationFailed, got {:?}", other.map(|words| words.len())),
    }
}

#[test]
fn test_validation_report_skipped_without_stats() {
    let config = Config {
        enable_validation: true,
        enable_validation_stats: false,
        ..Config::default()
    };
    assert!(!report_validation_stats(&config));

    let config = Config {
        enable_validation: false,
        enable_validation_stats: true,
        ..Config::default()
    };
    assert!(!report_validation_stats(&config));
}

#[test]
fn test_validation_report_printed_with_stats() {
    let config = Config {
        enable_validation: true,
        enable_validation_stats: true,
        ..Config::default()
    };
    assert!(report_validation_stats(&config));
}
