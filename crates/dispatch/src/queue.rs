//! Bounded per-subscriber queue
//!
//! Each subscriber owns one of these. The publisher side appends under a
//! short mutex and never waits; the consumer side parks on a
//! `tokio::sync::Notify` until an event arrives or the queue is
//! disconnected.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::Notify;

/// What to do when a subscriber's queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Drop the oldest queued event to make room for the new one.
    DropOldest,
    /// Disconnect the lagging subscriber; buffered events are still
    /// delivered, then the stream ends.
    DisconnectSubscriber,
}

/// Result of one enqueue attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EnqueueOutcome {
    Queued,
    DroppedOldest,
    Disconnected,
}

struct QueueState<E> {
    buf: VecDeque<E>,
    dropped: u64,
    disconnected: bool,
}

pub(crate) struct SubscriberQueue<E> {
    state: Mutex<QueueState<E>>,
    notify: Notify,
    capacity: usize,
    policy: OverflowPolicy,
}

impl<E> SubscriberQueue<E> {
    pub(crate) fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            state: Mutex::new(QueueState {
                buf: VecDeque::with_capacity(capacity),
                dropped: 0,
                disconnected: false,
            }),
            notify: Notify::new(),
            capacity,
            policy,
        }
    }

    /// Append an event, applying the overflow policy when full.
    /// Never blocks.
    pub(crate) fn enqueue(&self, event: E) -> EnqueueOutcome {
        let outcome = {
            let mut state = self.state.lock();
            if state.disconnected {
                return EnqueueOutcome::Disconnected;
            }
            if state.buf.len() >= self.capacity {
                match self.policy {
                    OverflowPolicy::DropOldest => {
                        state.buf.pop_front();
                        state.dropped += 1;
                        state.buf.push_back(event);
                        EnqueueOutcome::DroppedOldest
                    }
                    OverflowPolicy::DisconnectSubscriber => {
                        state.disconnected = true;
                        EnqueueOutcome::Disconnected
                    }
                }
            } else {
                state.buf.push_back(event);
                EnqueueOutcome::Queued
            }
        };
        self.notify.notify_one();
        outcome
    }

    /// Mark the queue disconnected. Buffered events remain receivable.
    pub(crate) fn disconnect(&self) {
        self.state.lock().disconnected = true;
        self.notify.notify_one();
    }

    /// Receive the next event, waiting if the queue is empty.
    /// Returns `None` once the queue is disconnected and drained.
    pub(crate) async fn recv(&self) -> Option<E> {
        loop {
            {
                let mut state = self.state.lock();
                if let Some(event) = state.buf.pop_front() {
                    return Some(event);
                }
                if state.disconnected {
                    return None;
                }
            }
            // notify_one stores a permit when nobody is waiting, so an
            // enqueue between the check above and this await is not lost
            self.notify.notified().await;
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.state.lock().buf.len()
    }

    pub(crate) fn dropped(&self) -> u64 {
        self.state.lock().dropped
    }

    pub(crate) fn is_disconnected(&self) -> bool {
        self.state.lock().disconnected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_enqueue_then_recv_in_order() {
        let queue = SubscriberQueue::new(8, OverflowPolicy::DropOldest);
        queue.enqueue(1u64);
        queue.enqueue(2);
        queue.enqueue(3);

        assert_eq!(queue.recv().await, Some(1));
        assert_eq!(queue.recv().await, Some(2));
        assert_eq!(queue.recv().await, Some(3));
        assert_eq!(queue.depth(), 0);
    }

    #[tokio::test]
    async fn test_drop_oldest_on_overflow() {
        let queue = SubscriberQueue::new(2, OverflowPolicy::DropOldest);
        assert_eq!(queue.enqueue(1u64), EnqueueOutcome::Queued);
        assert_eq!(queue.enqueue(2), EnqueueOutcome::Queued);
        assert_eq!(queue.enqueue(3), EnqueueOutcome::DroppedOldest);

        assert_eq!(queue.dropped(), 1);
        assert_eq!(queue.recv().await, Some(2));
        assert_eq!(queue.recv().await, Some(3));
    }

    #[tokio::test]
    async fn test_disconnect_on_overflow() {
        let queue = SubscriberQueue::new(1, OverflowPolicy::DisconnectSubscriber);
        assert_eq!(queue.enqueue(1u64), EnqueueOutcome::Queued);
        assert_eq!(queue.enqueue(2), EnqueueOutcome::Disconnected);

        assert!(queue.is_disconnected());
        // buffered event still delivered, then the stream ends
        assert_eq!(queue.recv().await, Some(1));
        assert_eq!(queue.recv().await, None);
    }

    #[tokio::test]
    async fn test_recv_wakes_on_enqueue() {
        use std::sync::Arc;

        let queue = Arc::new(SubscriberQueue::new(8, OverflowPolicy::DropOldest));
        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.recv().await })
        };

        tokio::task::yield_now().await;
        queue.enqueue(7u64);

        assert_eq!(consumer.await.unwrap(), Some(7));
    }
}
