//! Composition root wiring position arbitration to spoken announcements
//!
//! Owns the tracking context, the playback controller and the periodic
//! full-address timer. The host delivers raw fixes and resolved addresses
//! here; everything else is internal.

use crate::announce::{announcement_for_change, full_address_announcement};
use crate::config::PipelineConfig;
use crate::controller::{SpeechEvent, SpeechPlaybackController};
use crate::engine::SpeechEngine;
use crate::error::SpeechError;
use crate::queue::Priority;
use guia_core::{AddressSnapshot, Position, Subscription};
use guia_geo::{Decision, PositionEvent, PositionTracker};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

struct PipelineInner {
    tracker: RwLock<PositionTracker>,
    // Clone of the tracker's bus; subscription and fan-out both go
    // through it so neither ever needs the tracker lock.
    position_bus: guia_core::NotificationBus<PositionEvent>,
    controller: SpeechPlaybackController,
    periodic_interval: Duration,
    periodic: Mutex<Option<JoinHandle<()>>>,
}

/// The whole chain: arbitration, change detection, announcement queue,
/// playback.
pub struct GuidePipeline {
    inner: Arc<PipelineInner>,
}

impl GuidePipeline {
    pub fn new(engine: Arc<dyn SpeechEngine>, config: PipelineConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Config)?;

        let controller = SpeechPlaybackController::new(engine, config.speech.clone())?;
        let tracker = PositionTracker::new(config.arbiter.clone());
        let position_bus = tracker.bus().clone();
        Ok(Self {
            inner: Arc::new(PipelineInner {
                tracker: RwLock::new(tracker),
                position_bus,
                controller,
                periodic_interval: Duration::from_millis(config.speech.periodic_interval_ms),
                periodic: Mutex::new(None),
            }),
        })
    }

    /// Start the playback controller and the periodic full-address timer.
    pub async fn start(&self) -> Result<(), SpeechError> {
        self.inner.controller.start().await?;

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(inner.periodic_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // Skip the immediate first tick; the periodic announcement
            // fires on the interval, not at startup.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let text = {
                    let tracker = inner.tracker.read();
                    tracker.current_address().and_then(full_address_announcement)
                };
                if let Some(text) = text {
                    debug!("enqueueing periodic full-address announcement");
                    inner
                        .controller
                        .enqueue_with_priority(text, Priority::Periodic);
                }
            }
        });
        *self.inner.periodic.lock() = Some(handle);

        info!("guide pipeline started");
        Ok(())
    }

    /// Stop timers and playback. Idempotent; call on teardown.
    pub fn shutdown(&self) {
        if let Some(handle) = self.inner.periodic.lock().take() {
            handle.abort();
        }
        self.inner.controller.shutdown();
        info!("guide pipeline shut down");
    }

    /// Feed one raw fix from the host sensor through arbitration.
    ///
    /// Observers hear the outcome after the tracker lock is released, so
    /// a callback may re-enter the position surface (another fix, a
    /// snapshot read) without deadlocking.
    pub fn deliver_fix(&self, position: Position) -> Decision {
        let accepted = position.clone();
        let decision = self.inner.tracker.write().offer(position);

        let event = match decision {
            Decision::FirstFix | Decision::Accepted { .. } => {
                PositionEvent::Accepted { position: accepted }
            }
            Decision::Rejected(rejection) => PositionEvent::NotUpdated {
                distance_meters: rejection.distance_meters,
                elapsed_ms: rejection.elapsed_ms,
            },
        };
        self.inner.position_bus.notify(&event);
        decision
    }

    /// Feed one resolved address for the accepted position. Detected field
    /// transitions become ranked announcements, drained on the next tick.
    pub fn deliver_address(&self, snapshot: AddressSnapshot, raw: Option<Value>) {
        let changes = self.inner.tracker.write().rotate_address(snapshot, raw);
        for change in &changes {
            if let Some((text, priority)) = announcement_for_change(change) {
                debug!(field = change.field.name(), rank = priority.rank(), "announcing change");
                self.inner.controller.enqueue_with_priority(text, priority);
            }
        }
    }

    // UI/test surface

    pub fn subscribe_position<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&PositionEvent) + Send + Sync + 'static,
    {
        self.inner.position_bus.subscribe(observer)
    }

    pub fn subscribe_speech<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&SpeechEvent) + Send + Sync + 'static,
    {
        self.inner.controller.subscribe(observer)
    }

    pub fn enqueue(&self, text: impl Into<String>, rank: i32) {
        self.inner.controller.enqueue(text, rank);
    }

    pub fn queue_size(&self) -> usize {
        self.inner.controller.queue_size()
    }

    pub fn is_speaking(&self) -> bool {
        self.inner.controller.is_speaking()
    }

    pub fn set_rate(&self, rate: f32) -> Result<(), SpeechError> {
        self.inner.controller.set_rate(rate)
    }

    pub fn set_pitch(&self, pitch: f32) -> Result<(), SpeechError> {
        self.inner.controller.set_pitch(pitch)
    }

    pub fn configuration(&self) -> crate::config::SpeechSettings {
        self.inner.controller.configuration()
    }

    pub fn clear_all_signatures(&self) {
        self.inner.tracker.write().clear_all_signatures();
    }

    pub fn last_accepted(&self) -> Option<Position> {
        self.inner.tracker.read().last_accepted().cloned()
    }

    pub fn current_address(&self) -> Option<AddressSnapshot> {
        self.inner.tracker.read().current_address().cloned()
    }

    /// The playback controller, for direct speech control (pause, resume,
    /// stop, immediate speak).
    pub fn controller(&self) -> &SpeechPlaybackController {
        &self.inner.controller
    }
}
