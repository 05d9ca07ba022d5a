//! Tests for priority queue ordering and the drain timer

use guia_spk::{Priority, SpeechPriorityQueue};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_drains_by_rank_descending() {
    let queue = SpeechPriorityQueue::new();
    queue.enqueue("street", 0);
    queue.enqueue("municipality", 2);
    queue.enqueue("district", 1);

    let order: Vec<String> = std::iter::from_fn(|| queue.dequeue_next())
        .map(|item| item.text)
        .collect();
    assert_eq!(order, vec!["municipality", "district", "street"]);
}

#[test]
fn test_fifo_within_one_rank() {
    let queue = SpeechPriorityQueue::new();
    queue.enqueue("first", 1);
    queue.enqueue("second", 1);
    queue.enqueue("third", 1);

    assert_eq!(queue.dequeue_next().unwrap().text, "first");
    assert_eq!(queue.dequeue_next().unwrap().text, "second");
    assert_eq!(queue.dequeue_next().unwrap().text, "third");
}

#[test]
fn test_periodic_rank_sits_below_change_ranks() {
    let queue = SpeechPriorityQueue::new();
    queue.enqueue_with_priority("full address", Priority::Periodic);
    queue.enqueue_with_priority("street", Priority::Street);

    assert_eq!(queue.dequeue_next().unwrap().text, "street");
    assert_eq!(queue.dequeue_next().unwrap().text, "full address");
    assert!(queue.dequeue_next().is_none());
}

#[test]
fn test_clear_and_size() {
    let queue = SpeechPriorityQueue::new();
    assert!(queue.is_empty());

    queue.enqueue("a", 0);
    queue.enqueue("b", 1);
    assert_eq!(queue.len(), 2);

    queue.clear();
    assert!(queue.is_empty());
    assert!(queue.dequeue_next().is_none());
}

#[test]
fn test_dequeue_on_empty_returns_none() {
    let queue = SpeechPriorityQueue::new();
    assert_eq!(queue.dequeue_next(), None);
}

#[tokio::test]
async fn test_timer_ticks_until_stopped() {
    let queue = Arc::new(SpeechPriorityQueue::new());
    let ticks = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&ticks);
    queue.start_timer(Duration::from_millis(10), move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    queue.stop_timer();
    let after_stop = ticks.load(Ordering::SeqCst);
    assert!(after_stop >= 3, "timer should have ticked, saw {}", after_stop);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), after_stop, "timer kept ticking after stop");
}

#[tokio::test]
async fn test_restarting_timer_replaces_previous_driver() {
    let queue = Arc::new(SpeechPriorityQueue::new());
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&first);
    queue.start_timer(Duration::from_millis(10), move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    let counter = Arc::clone(&second);
    queue.start_timer(Duration::from_millis(10), move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    tokio::time::sleep(Duration::from_millis(60)).await;
    queue.stop_timer();

    assert_eq!(first.load(Ordering::SeqCst), 0, "old driver survived restart");
    assert!(second.load(Ordering::SeqCst) >= 2);
}
