//! Playback state machine driving the host speech engine

use crate::config::{SpeechConfig, SpeechSettings, VoiceSelectionConfig};
use crate::engine::{SpeechEngine, Utterance};
use crate::error::SpeechError;
use crate::queue::{Priority, SpeechPriorityQueue};
use crate::voices::VoiceResolver;
use guia_core::{NotificationBus, Subscription};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Speaking states. Only one item is ever in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Speaking,
    Paused,
}

/// Speech-state transitions published to observers.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    Started { text: String },
    Ended { text: String },
    /// No voice was available; the item was dropped without playing.
    Skipped { text: String },
    Paused,
    Resumed,
    Stopped,
}

struct ControllerInner {
    engine: Arc<dyn SpeechEngine>,
    queue: Arc<SpeechPriorityQueue>,
    resolver: Arc<VoiceResolver>,
    settings: RwLock<SpeechSettings>,
    voice_config: VoiceSelectionConfig,
    drain_interval: Duration,
    state: RwLock<PlaybackState>,
    // Bumped by stop(); invalidates pumps that were in flight before it.
    generation: AtomicU64,
    bus: NotificationBus<SpeechEvent>,
}

/// Orchestrates settings, queue and voice resolution against the host
/// engine.
///
/// `speak` while already speaking enqueues rather than preempts; ordering
/// is entirely queue-rank based. Rate, pitch and voice are read at the
/// moment an item begins playing.
pub struct SpeechPlaybackController {
    inner: Arc<ControllerInner>,
}

impl SpeechPlaybackController {
    pub fn new(engine: Arc<dyn SpeechEngine>, config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Config)?;

        let resolver = Arc::new(VoiceResolver::new(Arc::clone(&engine), config.retry.clone()));
        Ok(Self {
            inner: Arc::new(ControllerInner {
                engine,
                queue: Arc::new(SpeechPriorityQueue::new()),
                resolver,
                settings: RwLock::new(config.settings.clone()),
                voice_config: config.voice.clone(),
                drain_interval: Duration::from_millis(config.drain_interval_ms),
                state: RwLock::new(PlaybackState::Idle),
                generation: AtomicU64::new(0),
                bus: NotificationBus::new(),
            }),
        })
    }

    /// Resolve a voice and start the drain timer.
    ///
    /// Fails when the host engine reports itself unavailable; a missing
    /// voice is not an error and merely causes items to be skipped.
    pub async fn start(&self) -> Result<(), SpeechError> {
        if !self.inner.engine.is_available() {
            return Err(SpeechError::Unavailable(format!(
                "speech engine '{}' not available",
                self.inner.engine.name()
            )));
        }

        self.inner.resolver.resolve(&self.inner.voice_config).await;

        let inner = Arc::clone(&self.inner);
        self.inner
            .queue
            .start_timer(self.inner.drain_interval, move || {
                let inner = Arc::clone(&inner);
                async move {
                    ControllerInner::pump(&inner).await;
                }
            });

        info!("speech playback controller started");
        Ok(())
    }

    /// Enqueue and immediately try to play. While something is already
    /// speaking this only enqueues.
    pub async fn speak(&self, text: impl Into<String>, priority: Priority) {
        self.inner.queue.enqueue_with_priority(text, priority);
        ControllerInner::pump(&self.inner).await;
    }

    /// Enqueue with a raw rank; drained on the next tick.
    pub fn enqueue(&self, text: impl Into<String>, rank: i32) {
        self.inner.queue.enqueue(text, rank);
    }

    /// Enqueue at one of the fixed ranks; drained on the next tick.
    pub fn enqueue_with_priority(&self, text: impl Into<String>, priority: Priority) {
        self.inner.queue.enqueue_with_priority(text, priority);
    }

    /// Drain the queue now instead of waiting for the next tick.
    pub async fn drain(&self) {
        ControllerInner::pump(&self.inner).await;
    }

    /// Cancel the current utterance and clear the queue. No stale item
    /// may play afterwards.
    pub fn stop(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        *self.inner.state.write() = PlaybackState::Idle;
        self.inner.queue.clear();
        self.inner.engine.cancel();
        self.inner.bus.notify(&SpeechEvent::Stopped);
        info!("speech playback stopped, queue cleared");
    }

    /// Stop playback and the drain timer. Call on teardown.
    pub fn shutdown(&self) {
        self.stop();
        self.inner.queue.stop_timer();
    }

    pub fn pause(&self) {
        let transitioned = {
            let mut state = self.inner.state.write();
            if *state == PlaybackState::Speaking {
                self.inner.engine.pause();
                *state = PlaybackState::Paused;
                true
            } else {
                false
            }
        };
        if transitioned {
            self.inner.bus.notify(&SpeechEvent::Paused);
        }
    }

    pub fn resume(&self) {
        let transitioned = {
            let mut state = self.inner.state.write();
            if *state == PlaybackState::Paused {
                self.inner.engine.resume();
                *state = PlaybackState::Speaking;
                true
            } else {
                false
            }
        };
        if transitioned {
            self.inner.bus.notify(&SpeechEvent::Resumed);
        }
    }

    pub fn state(&self) -> PlaybackState {
        *self.inner.state.read()
    }

    pub fn is_speaking(&self) -> bool {
        self.state() == PlaybackState::Speaking
    }

    pub fn queue_size(&self) -> usize {
        self.inner.queue.len()
    }

    pub fn set_rate(&self, rate: f32) -> Result<(), SpeechError> {
        self.inner.settings.write().set_rate(rate)
    }

    pub fn set_pitch(&self, pitch: f32) -> Result<(), SpeechError> {
        self.inner.settings.write().set_pitch(pitch)
    }

    /// Snapshot of the current rate/pitch state.
    pub fn configuration(&self) -> SpeechSettings {
        self.inner.settings.read().clone()
    }

    pub fn reset_configuration(&self) {
        self.inner.settings.write().reset();
    }

    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&SpeechEvent) + Send + Sync + 'static,
    {
        self.inner.bus.subscribe(observer)
    }

    /// The resolver backing this controller, for cache control.
    pub fn resolver(&self) -> &Arc<VoiceResolver> {
        &self.inner.resolver
    }
}

impl ControllerInner {
    /// Pull items while idle and the queue has content.
    ///
    /// Claims the speaking slot under the state lock, so concurrent pumps
    /// (timer tick racing a direct `speak` call) cannot both dequeue.
    async fn pump(inner: &Arc<ControllerInner>) {
        loop {
            let generation = inner.generation.load(Ordering::SeqCst);

            let item = {
                let mut state = inner.state.write();
                if *state != PlaybackState::Idle {
                    return;
                }
                match inner.queue.dequeue_next() {
                    Some(item) => {
                        *state = PlaybackState::Speaking;
                        item
                    }
                    None => return,
                }
            };

            let voice = inner.resolver.selection();
            let Some(voice) = voice else {
                // Recoverable environmental condition: skip, never throw.
                debug!(text = %item.text, "no voice selected, skipping announcement");
                {
                    let mut state = inner.state.write();
                    if *state == PlaybackState::Speaking {
                        *state = PlaybackState::Idle;
                    }
                }
                inner.bus.notify(&SpeechEvent::Skipped { text: item.text });
                continue;
            };

            let utterance = {
                let settings = inner.settings.read();
                Utterance {
                    text: item.text.clone(),
                    rate: settings.rate(),
                    pitch: settings.pitch(),
                    voice: Some(voice),
                }
            };

            inner.bus.notify(&SpeechEvent::Started {
                text: item.text.clone(),
            });

            if let Err(e) = inner.engine.speak(&utterance).await {
                warn!(error = %e, text = %item.text, "utterance failed");
            }

            // stop() intervened while we were speaking; its state wins and
            // nothing more may be dequeued from this pump.
            if inner.generation.load(Ordering::SeqCst) != generation {
                return;
            }

            {
                let mut state = inner.state.write();
                if *state != PlaybackState::Speaking {
                    return;
                }
                *state = PlaybackState::Idle;
            }
            inner.bus.notify(&SpeechEvent::Ended { text: item.text });
            // Loop: immediately check the queue for the next item.
        }
    }
}
