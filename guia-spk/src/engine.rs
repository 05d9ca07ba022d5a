//! Contract consumed from the host speech engine

use crate::error::SpeechError;
use crate::voices::VoiceDescriptor;
use async_trait::async_trait;

/// One discrete unit of text submitted for playback, together with the
/// delivery parameters captured at the moment playback begins.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub voice: Option<VoiceDescriptor>,
}

/// Narrow seam over the host platform's text-to-speech engine.
///
/// The pipeline never talks to the platform directly; tests substitute
/// scripted implementations.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Snapshot of the voice inventory. May legitimately be empty while
    /// the host is still populating it.
    fn voices(&self) -> Vec<VoiceDescriptor>;

    /// Play one utterance. Resolves when the engine signals the end of
    /// playback (or an error).
    async fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError>;

    /// Best-effort cancellation of the current utterance.
    fn cancel(&self);

    /// Pause the current utterance.
    fn pause(&self);

    /// Resume a paused utterance.
    fn resume(&self);

    /// Check if the engine is usable in this environment.
    fn is_available(&self) -> bool;

    /// Get engine name
    fn name(&self) -> &str;
}
