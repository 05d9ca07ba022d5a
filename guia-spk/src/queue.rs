//! Ranked queue of pending announcements with an interval drain driver

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BinaryHeap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// The one rank type shared by the queue and the announcement builders.
///
/// Higher value speaks first. The periodic full-address announcement sits
/// below every change-driven rank so it can never starve them.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Periodic = -1,
    Street = 0,
    District = 1,
    Municipality = 2,
}

impl Priority {
    pub fn rank(self) -> i32 {
        self as i32
    }
}

/// One pending announcement.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueItem {
    pub text: String,
    pub rank: i32,
    pub enqueued_at: DateTime<Utc>,
    seq: u64,
}

struct HeapEntry(QueueItem);

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.0.rank == other.0.rank && self.0.seq == other.0.seq
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Max-heap: rank descending, then enqueue order within a rank.
        self.0
            .rank
            .cmp(&other.0.rank)
            .then_with(|| other.0.seq.cmp(&self.0.seq))
    }
}

/// Passive ordered container for pending announcements, plus the interval
/// driver the controller uses to drain it.
///
/// Holds no concurrency of its own; ordering is rank descending with FIFO
/// tie-break inside a rank.
pub struct SpeechPriorityQueue {
    items: Mutex<BinaryHeap<HeapEntry>>,
    next_seq: AtomicU64,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Default for SpeechPriorityQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechPriorityQueue {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(BinaryHeap::new()),
            next_seq: AtomicU64::new(0),
            timer: Mutex::new(None),
        }
    }

    /// Add an announcement with a raw integer rank.
    pub fn enqueue(&self, text: impl Into<String>, rank: i32) {
        let item = QueueItem {
            text: text.into(),
            rank,
            enqueued_at: Utc::now(),
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        };
        self.items.lock().push(HeapEntry(item));
    }

    /// Add an announcement at one of the fixed ranks.
    pub fn enqueue_with_priority(&self, text: impl Into<String>, priority: Priority) {
        self.enqueue(text, priority.rank());
    }

    /// Remove and return the highest-ranked, oldest pending item.
    pub fn dequeue_next(&self) -> Option<QueueItem> {
        self.items.lock().pop().map(|entry| entry.0)
    }

    /// Discard every pending item.
    pub fn clear(&self) {
        self.items.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Start the drain driver, replacing any previous one. `on_tick` runs
    /// once per interval until [`stop_timer`](Self::stop_timer).
    pub fn start_timer<F, Fut>(&self, interval: Duration, mut on_tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let mut guard = self.timer.lock();
        if let Some(previous) = guard.take() {
            previous.abort();
        }

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of a tokio interval fires immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                on_tick().await;
            }
        });
        *guard = Some(handle);
    }

    /// Stop the drain driver. Required on teardown; also runs on drop.
    pub fn stop_timer(&self) {
        if let Some(handle) = self.timer.lock().take() {
            handle.abort();
        }
    }
}

impl Drop for SpeechPriorityQueue {
    fn drop(&mut self) {
        self.stop_timer();
    }
}
