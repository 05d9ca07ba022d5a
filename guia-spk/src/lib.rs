//! guia-spk: prioritized spoken announcements for the guia pipeline
//!
//! Turns accepted address changes into speech:
//! - Validated, clamped rate/pitch settings
//! - Voice inventory acquisition with retry/backoff and scored selection
//! - Priority-ordered announcement queue with an interval drain driver
//! - Playback state machine against the host speech engine
//! - GuidePipeline, the composition root wiring position arbitration,
//!   change detection and speech together

pub mod announce;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod queue;
pub mod voices;

pub use config::{PipelineConfig, RetryConfig, SpeechConfig, SpeechSettings, VoiceSelectionConfig};
pub use controller::{PlaybackState, SpeechEvent, SpeechPlaybackController};
pub use engine::{SpeechEngine, Utterance};
pub use error::{Result, SpeechError};
pub use pipeline::GuidePipeline;
pub use queue::{Priority, QueueItem, SpeechPriorityQueue};
pub use voices::{score_voice, select_voice, VoiceDescriptor, VoiceResolver};
