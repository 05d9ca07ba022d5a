//! Voice inventory acquisition and scored selection

use crate::config::{RetryConfig, VoiceSelectionConfig};
use crate::engine::SpeechEngine;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Metadata about one synthetic-speech voice, as reported by the host
/// engine's inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceDescriptor {
    pub name: String,
    /// BCP-47 style language tag, e.g. "pt-BR".
    pub language: String,
    /// Whether the voice is installed locally (as opposed to streamed).
    pub is_local: bool,
}

/// Rank a voice against the primary language tag.
///
/// local + primary match > primary match > local only > neither. Used to
/// break ties deterministically and exposed for introspection.
pub fn score_voice(voice: &VoiceDescriptor, primary_language: &str) -> u8 {
    let primary = voice.language.eq_ignore_ascii_case(primary_language);
    match (voice.is_local, primary) {
        (true, true) => 3,
        (false, true) => 2,
        (true, false) => 1,
        (false, false) => 0,
    }
}

fn best_match<'a>(
    voices: &'a [VoiceDescriptor],
    primary_language: &str,
    matches: impl Fn(&VoiceDescriptor) -> bool,
) -> Option<&'a VoiceDescriptor> {
    let mut best: Option<(&VoiceDescriptor, u8)> = None;
    for voice in voices.iter().filter(|v| matches(v)) {
        let score = score_voice(voice, primary_language);
        match best {
            // Strict comparison keeps the first voice on equal scores.
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((voice, score)),
        }
    }
    best.map(|(voice, _)| voice)
}

/// Pick the best available voice.
///
/// Exact case-insensitive match on the primary tag first (local voices
/// preferred), then a prefix match on the fallback prefix (again local
/// preferred), then the first voice in list order. `None` only for an
/// empty list.
pub fn select_voice<'a>(
    voices: &'a [VoiceDescriptor],
    primary_language: &str,
    fallback_prefix: &str,
) -> Option<&'a VoiceDescriptor> {
    if let Some(exact) = best_match(voices, primary_language, |v| {
        v.language.eq_ignore_ascii_case(primary_language)
    }) {
        return Some(exact);
    }

    let prefix = fallback_prefix.to_ascii_lowercase();
    if let Some(fallback) = best_match(voices, primary_language, |v| {
        v.language.to_ascii_lowercase().starts_with(&prefix)
    }) {
        return Some(fallback);
    }

    voices.first()
}

/// Acquires the voice inventory from the host engine.
///
/// The host may populate its inventory asynchronously, so an empty result
/// is retried on a doubling schedule bounded by [`RetryConfig`]. A
/// non-empty inventory is cached until [`VoiceResolver::clear_cache`];
/// exhausting the retries degrades to an empty list rather than an error.
pub struct VoiceResolver {
    engine: Arc<dyn SpeechEngine>,
    retry: RetryConfig,
    cache: RwLock<Option<Vec<VoiceDescriptor>>>,
    selected: RwLock<Option<VoiceDescriptor>>,
    // Serializes concurrent loads so only one retry schedule runs.
    load_gate: tokio::sync::Mutex<()>,
}

impl VoiceResolver {
    pub fn new(engine: Arc<dyn SpeechEngine>, retry: RetryConfig) -> Self {
        Self {
            engine,
            retry,
            cache: RwLock::new(None),
            selected: RwLock::new(None),
            load_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Load the voice inventory, retrying while the host reports it empty.
    ///
    /// Concurrent callers share one in-flight resolution; whoever arrives
    /// while a load is running waits for its outcome instead of starting a
    /// second retry schedule.
    pub async fn load_voices(&self) -> Vec<VoiceDescriptor> {
        if let Some(cached) = self.cache.read().clone() {
            return cached;
        }

        let _gate = self.load_gate.lock().await;
        // A concurrent load may have filled the cache while we waited.
        if let Some(cached) = self.cache.read().clone() {
            return cached;
        }

        let attempts = self.retry.max_retries;
        let mut delay = Duration::from_millis(self.retry.initial_delay_ms);
        let max_delay = Duration::from_millis(self.retry.max_delay_ms);

        for attempt in 1..=attempts {
            let voices = self.engine.voices();
            if !voices.is_empty() {
                debug!(count = voices.len(), attempt, "voice inventory loaded");
                *self.cache.write() = Some(voices.clone());
                return voices;
            }

            if attempt < attempts {
                debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "voice inventory empty, retrying"
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(max_delay);
            }
        }

        warn!(
            attempts,
            "voice inventory still empty after all attempts, continuing without voices"
        );
        Vec::new()
    }

    /// Load the inventory and cache the selection for the configured
    /// language preferences.
    pub async fn resolve(&self, config: &VoiceSelectionConfig) -> Option<VoiceDescriptor> {
        let voices = self.load_voices().await;
        let selected =
            select_voice(&voices, &config.primary_language, &config.fallback_prefix).cloned();

        match &selected {
            Some(voice) => info!(
                voice = %voice.name,
                language = %voice.language,
                is_local = voice.is_local,
                "voice selected"
            ),
            None => warn!("no voice available, announcements will be skipped"),
        }

        *self.selected.write() = selected.clone();
        selected
    }

    /// The selection cached by the last [`resolve`](Self::resolve) call.
    pub fn selection(&self) -> Option<VoiceDescriptor> {
        self.selected.read().clone()
    }

    /// Drop the cached inventory and selection; the next load re-queries
    /// and re-retries.
    pub fn clear_cache(&self) {
        *self.cache.write() = None;
        *self.selected.write() = None;
    }
}
