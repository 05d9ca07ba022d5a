//! Configuration for the announcement pipeline

use crate::error::SpeechError;
use guia_geo::ArbiterConfig;
use serde::{Deserialize, Serialize};

/// Speech rate bounds (multiplier of the engine's normal rate).
pub const MIN_RATE: f32 = 0.1;
pub const MAX_RATE: f32 = 10.0;

/// Speech pitch bounds.
pub const MIN_PITCH: f32 = 0.0;
pub const MAX_PITCH: f32 = 2.0;

/// Validated, clamped rate/pitch state read at the moment an item begins
/// playing.
///
/// `NaN` is rejected; any other numeric input is clamped into range, never
/// rejected. Defaults are `1.0` for both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    rate: f32,
    pitch: f32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

impl SpeechSettings {
    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Set the speech rate. Rejects `NaN` without touching the stored
    /// value; out-of-range input is clamped into `[0.1, 10.0]`.
    pub fn set_rate(&mut self, rate: f32) -> Result<(), SpeechError> {
        if rate.is_nan() {
            return Err(SpeechError::InvalidArgument(
                "Speech rate must be a number".to_string(),
            ));
        }
        self.rate = rate.clamp(MIN_RATE, MAX_RATE);
        Ok(())
    }

    /// Set the speech pitch. Rejects `NaN` without touching the stored
    /// value; out-of-range input is clamped into `[0.0, 2.0]`.
    pub fn set_pitch(&mut self, pitch: f32) -> Result<(), SpeechError> {
        if pitch.is_nan() {
            return Err(SpeechError::InvalidArgument(
                "Speech pitch must be a number".to_string(),
            ));
        }
        self.pitch = pitch.clamp(MIN_PITCH, MAX_PITCH);
        Ok(())
    }

    /// Restore both values to `1.0`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Language preferences for voice selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSelectionConfig {
    /// Exact language tag to look for first (e.g. "pt-BR").
    pub primary_language: String,

    /// Prefix accepted when no exact match exists (e.g. "pt").
    pub fallback_prefix: String,
}

impl Default for VoiceSelectionConfig {
    fn default() -> Self {
        Self {
            primary_language: "pt-BR".to_string(),
            fallback_prefix: "pt".to_string(),
        }
    }
}

impl VoiceSelectionConfig {
    /// Validate voice selection configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.primary_language.is_empty() {
            return Err("Primary language tag cannot be empty".to_string());
        }

        if self.primary_language.len() > 32 {
            return Err("Primary language tag too long (max 32 chars)".to_string());
        }

        if !self
            .primary_language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(
                "Primary language tag contains invalid characters (only alphanumeric and '-' allowed)"
                    .to_string(),
            );
        }

        if self.fallback_prefix.is_empty() {
            return Err("Fallback language prefix cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Retry configuration for voice inventory loading
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum inventory attempts, first call included
    pub max_retries: u32,

    /// Initial retry delay in milliseconds
    pub initial_delay_ms: u64,

    /// Maximum retry delay in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
        }
    }
}

impl RetryConfig {
    /// Validate retry configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 {
            return Err("Max retries must be at least 1".to_string());
        }

        if self.max_retries > 100 {
            return Err("Max retries too large (max 100)".to_string());
        }

        if self.initial_delay_ms > 60_000 {
            return Err("Initial delay too large (max 60000 ms)".to_string());
        }

        if self.max_delay_ms > 300_000 {
            return Err("Max delay too large (max 300000 ms)".to_string());
        }

        if self.initial_delay_ms > self.max_delay_ms {
            return Err("Initial delay cannot be greater than max delay".to_string());
        }

        Ok(())
    }
}

/// Speech-side configuration consumed by the playback controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Initial rate/pitch state.
    pub settings: SpeechSettings,

    /// Voice selection preferences.
    pub voice: VoiceSelectionConfig,

    /// Voice inventory retry schedule.
    pub retry: RetryConfig,

    /// Queue drain tick interval in milliseconds.
    pub drain_interval_ms: u64,

    /// Periodic full-address announcement interval in milliseconds.
    pub periodic_interval_ms: u64,
}

impl SpeechConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        self.voice.validate()?;
        self.retry.validate()?;

        if self.drain_interval_ms == 0 {
            return Err("Drain interval must be greater than 0 ms".to_string());
        }

        if self.periodic_interval_ms == 0 {
            return Err("Periodic announcement interval must be greater than 0 ms".to_string());
        }

        Ok(())
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            settings: SpeechSettings::default(),
            voice: VoiceSelectionConfig::default(),
            retry: RetryConfig::default(),
            drain_interval_ms: 500,
            periodic_interval_ms: 60_000,
        }
    }
}

/// Whole-pipeline configuration: position thresholds plus the speech side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub arbiter: ArbiterConfig,
    pub speech: SpeechConfig,
}

impl PipelineConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        self.arbiter.validate()?;
        self.speech.validate()
    }
}
