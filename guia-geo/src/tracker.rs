//! Tracking context owned by the composition root
//!
//! Replaces the original design's singleton position/status managers with
//! one explicitly constructed object holding the last accepted fix, the
//! current/previous address snapshots, the change detector and the
//! position observer bus.

use crate::arbiter::{evaluate, ArbiterConfig, Decision};
use crate::change::{ChangeDetails, ChangeDetector};
use guia_core::{AddressField, AddressSnapshot, NotificationBus, Position, Subscription};
use serde_json::Value;
use tracing::{debug, info};

/// Events published to position observers.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionEvent {
    /// A candidate fix passed arbitration and is now the tracked position.
    Accepted { position: Position },
    /// A candidate fix was discarded; carried for UI feedback only.
    NotUpdated {
        distance_meters: f64,
        elapsed_ms: i64,
    },
}

/// Holds everything the pipeline knows about "where we are".
pub struct PositionTracker {
    config: ArbiterConfig,
    last_accepted: Option<Position>,
    current_address: Option<AddressSnapshot>,
    previous_address: Option<AddressSnapshot>,
    current_raw: Option<Value>,
    previous_raw: Option<Value>,
    detector: ChangeDetector,
    bus: NotificationBus<PositionEvent>,
}

impl PositionTracker {
    pub fn new(config: ArbiterConfig) -> Self {
        Self {
            config,
            last_accepted: None,
            current_address: None,
            previous_address: None,
            current_raw: None,
            previous_raw: None,
            detector: ChangeDetector::new(),
            bus: NotificationBus::new(),
        }
    }

    /// Arbitrate one delivered fix.
    ///
    /// On accept the fix becomes the tracked position; on reject the
    /// tracked position is untouched. Observers are never called from
    /// here: the owner publishes the outcome through [`bus`](Self::bus)
    /// once it no longer holds any lock on the tracker, so an observer
    /// may re-enter the tracker's surface.
    pub fn offer(&mut self, candidate: Position) -> Decision {
        let decision = evaluate(&candidate, self.last_accepted.as_ref(), &self.config);

        match decision {
            Decision::FirstFix | Decision::Accepted { .. } => {
                info!(
                    latitude = candidate.latitude,
                    longitude = candidate.longitude,
                    "position accepted"
                );
                self.last_accepted = Some(candidate);
            }
            Decision::Rejected(rejection) => {
                debug!(
                    distance_meters = rejection.distance_meters,
                    elapsed_ms = rejection.elapsed_ms,
                    "position rejected, thresholds not met"
                );
            }
        }

        decision
    }

    /// Install a freshly resolved address, atomically rotating the
    /// previous/current pair, and report which tracked fields changed.
    ///
    /// Only transitions the detector has not already reported are
    /// returned; the caller turns them into announcements.
    pub fn rotate_address(
        &mut self,
        snapshot: AddressSnapshot,
        raw: Option<Value>,
    ) -> Vec<ChangeDetails> {
        self.previous_address = self.current_address.take();
        self.previous_raw = self.current_raw.take();
        self.current_address = Some(snapshot);
        self.current_raw = raw;

        let current = self.current_address.as_ref();
        let previous = self.previous_address.as_ref();

        let mut changes = Vec::new();
        for field in AddressField::ALL {
            if self.detector.has_field_changed(field, current, previous) {
                changes.push(self.detector.change_details(
                    field,
                    current,
                    previous,
                    self.current_raw.as_ref(),
                    self.previous_raw.as_ref(),
                ));
            }
        }
        changes
    }

    /// Drop the tracked position. Observers are deliberately not notified;
    /// there is no payload to deliver.
    pub fn clear_position(&mut self) {
        self.last_accepted = None;
    }

    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&PositionEvent) + Send + Sync + 'static,
    {
        self.bus.subscribe(observer)
    }

    /// The underlying bus, for callers that need to register observers
    /// without holding a borrow of the tracker itself.
    pub fn bus(&self) -> &NotificationBus<PositionEvent> {
        &self.bus
    }

    pub fn last_accepted(&self) -> Option<&Position> {
        self.last_accepted.as_ref()
    }

    pub fn current_address(&self) -> Option<&AddressSnapshot> {
        self.current_address.as_ref()
    }

    pub fn previous_address(&self) -> Option<&AddressSnapshot> {
        self.previous_address.as_ref()
    }

    pub fn clear_field_signature(&mut self, field: AddressField) {
        self.detector.clear_field_signature(field);
    }

    pub fn clear_all_signatures(&mut self) {
        self.detector.clear_all_signatures();
    }
}
