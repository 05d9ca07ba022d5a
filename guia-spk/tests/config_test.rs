//! Tests for speech configuration validation and clamping

use guia_spk::{PipelineConfig, RetryConfig, SpeechConfig, SpeechError, SpeechSettings, VoiceSelectionConfig};

#[test]
fn test_settings_defaults() {
    let settings = SpeechSettings::default();
    assert_eq!(settings.rate(), 1.0);
    assert_eq!(settings.pitch(), 1.0);
}

#[test]
fn test_rate_clamped_not_rejected() {
    let mut settings = SpeechSettings::default();

    settings.set_rate(15.0).unwrap();
    assert_eq!(settings.rate(), 10.0);

    settings.set_rate(-1.0).unwrap();
    assert_eq!(settings.rate(), 0.1);

    settings.set_rate(2.5).unwrap();
    assert_eq!(settings.rate(), 2.5);
}

#[test]
fn test_pitch_clamped_not_rejected() {
    let mut settings = SpeechSettings::default();

    settings.set_pitch(5.0).unwrap();
    assert_eq!(settings.pitch(), 2.0);

    settings.set_pitch(-0.5).unwrap();
    assert_eq!(settings.pitch(), 0.0);
}

#[test]
fn test_nan_rejected_and_prior_value_kept() {
    let mut settings = SpeechSettings::default();
    settings.set_rate(2.0).unwrap();

    let err = settings.set_rate(f32::NAN).unwrap_err();
    assert!(matches!(err, SpeechError::InvalidArgument(_)));
    assert_eq!(settings.rate(), 2.0);

    let err = settings.set_pitch(f32::NAN).unwrap_err();
    assert!(matches!(err, SpeechError::InvalidArgument(_)));
    assert_eq!(settings.pitch(), 1.0);
}

#[test]
fn test_reset_restores_defaults() {
    let mut settings = SpeechSettings::default();
    settings.set_rate(3.0).unwrap();
    settings.set_pitch(0.5).unwrap();

    settings.reset();
    assert_eq!(settings.rate(), 1.0);
    assert_eq!(settings.pitch(), 1.0);
}

#[test]
fn test_retry_config_validation() {
    assert!(RetryConfig::default().validate().is_ok());

    let zero_retries = RetryConfig {
        max_retries: 0,
        ..RetryConfig::default()
    };
    assert!(zero_retries.validate().is_err());

    let inverted_delays = RetryConfig {
        initial_delay_ms: 10_000,
        max_delay_ms: 1_000,
        ..RetryConfig::default()
    };
    assert!(inverted_delays.validate().is_err());
}

#[test]
fn test_voice_selection_validation() {
    assert!(VoiceSelectionConfig::default().validate().is_ok());

    let empty_primary = VoiceSelectionConfig {
        primary_language: String::new(),
        ..VoiceSelectionConfig::default()
    };
    assert!(empty_primary.validate().is_err());

    let bad_chars = VoiceSelectionConfig {
        primary_language: "pt_BR!".to_string(),
        ..VoiceSelectionConfig::default()
    };
    assert!(bad_chars.validate().is_err());
}

#[test]
fn test_speech_config_validation() {
    assert!(SpeechConfig::default().validate().is_ok());

    let zero_drain = SpeechConfig {
        drain_interval_ms: 0,
        ..SpeechConfig::default()
    };
    assert!(zero_drain.validate().is_err());

    let zero_periodic = SpeechConfig {
        periodic_interval_ms: 0,
        ..SpeechConfig::default()
    };
    assert!(zero_periodic.validate().is_err());
}

#[test]
fn test_pipeline_config_roundtrips_through_json() {
    let config = PipelineConfig::default();
    assert!(config.validate().is_ok());

    let json = serde_json::to_string(&config).unwrap();
    let back: PipelineConfig = serde_json::from_str(&json).unwrap();
    assert!(back.validate().is_ok());
    assert_eq!(back.speech.drain_interval_ms, config.speech.drain_interval_ms);
}
