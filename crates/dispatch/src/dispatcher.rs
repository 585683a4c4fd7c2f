//! Per-auction topics and subscriber registry
//!
//! The registry maps auction ids to topics behind a read-write lock;
//! each topic guards its own subscriber table. Publishes on different
//! auctions only share the brief registry read lock, never each
//! other's subscriber tables.

use common::{AuctionId, SubscriberId};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::queue::{EnqueueOutcome, OverflowPolicy, SubscriberQueue};

/// Dispatcher configuration, usually mapped from the config file.
#[derive(Debug, Clone, Copy)]
pub struct DispatchConfig {
    /// Maximum queued events per subscriber.
    pub queue_capacity: usize,
    /// Applied per subscriber when its queue is full.
    pub overflow_policy: OverflowPolicy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            overflow_policy: OverflowPolicy::DropOldest,
        }
    }
}

/// Outcome of one publish across a topic's subscribers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishStats {
    pub delivered: usize,
    pub dropped_oldest: usize,
    pub disconnected: usize,
}

struct Topic<E> {
    subscribers: Mutex<HashMap<SubscriberId, Arc<SubscriberQueue<E>>>>,
}

impl<E> Topic<E> {
    fn new() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
        }
    }
}

/// Fan-out hub: one topic per auction, one bounded queue per subscriber.
///
/// `publish` is called by the matching engine inside its per-auction
/// critical section, so events reach every queue in sequence order.
/// Nothing here ever blocks the publisher.
pub struct Dispatcher<E> {
    topics: RwLock<HashMap<AuctionId, Arc<Topic<E>>>>,
    config: DispatchConfig,
}

impl<E: Clone> Dispatcher<E> {
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Deliver an event to every active subscriber of the auction.
    ///
    /// Disconnected subscribers (overflow policy, or a dropped
    /// `EventStream`) are pruned as they are encountered.
    pub fn publish(&self, auction_id: AuctionId, event: &E) -> PublishStats {
        let mut stats = PublishStats::default();
        let Some(topic) = self.topics.read().get(&auction_id).cloned() else {
            return stats;
        };

        let mut subscribers = topic.subscribers.lock();
        subscribers.retain(|subscriber_id, queue| {
            if queue.is_disconnected() {
                debug!(%auction_id, %subscriber_id, "Pruning disconnected subscriber");
                return false;
            }
            match queue.enqueue(event.clone()) {
                EnqueueOutcome::Queued => {
                    stats.delivered += 1;
                    true
                }
                EnqueueOutcome::DroppedOldest => {
                    stats.delivered += 1;
                    stats.dropped_oldest += 1;
                    warn!(
                        %auction_id,
                        %subscriber_id,
                        dropped_total = queue.dropped(),
                        "Subscriber queue full, dropped oldest event"
                    );
                    true
                }
                EnqueueOutcome::Disconnected => {
                    stats.disconnected += 1;
                    warn!(%auction_id, %subscriber_id, "Disconnecting lagging subscriber");
                    false
                }
            }
        });

        stats
    }

    /// Register a new subscriber on an auction.
    ///
    /// `first` is enqueued before the stream is handed out, so a
    /// state snapshot can precede all future events without a gap.
    pub fn subscribe(&self, auction_id: AuctionId, first: Option<E>) -> EventStream<E> {
        let subscriber_id = SubscriberId::new();
        let queue = Arc::new(SubscriberQueue::new(
            self.config.queue_capacity,
            self.config.overflow_policy,
        ));
        if let Some(event) = first {
            queue.enqueue(event);
        }

        let topic = {
            let mut topics = self.topics.write();
            Arc::clone(topics.entry(auction_id).or_insert_with(|| Arc::new(Topic::new())))
        };
        topic
            .subscribers
            .lock()
            .insert(subscriber_id, Arc::clone(&queue));
        debug!(%auction_id, %subscriber_id, "Subscriber registered");

        EventStream {
            auction_id,
            subscriber_id,
            queue,
        }
    }

    /// Remove a subscriber explicitly, ending its stream.
    pub fn unsubscribe(&self, auction_id: AuctionId, subscriber_id: SubscriberId) {
        let Some(topic) = self.topics.read().get(&auction_id).cloned() else {
            return;
        };
        let removed = topic.subscribers.lock().remove(&subscriber_id);
        if let Some(queue) = removed {
            queue.disconnect();
        }
    }

    /// Drop a whole topic, ending every remaining stream.
    pub fn close_topic(&self, auction_id: AuctionId) {
        let topic = self.topics.write().remove(&auction_id);
        if let Some(topic) = topic {
            for queue in topic.subscribers.lock().values() {
                queue.disconnect();
            }
        }
    }

    /// Number of currently registered subscribers on an auction.
    pub fn subscriber_count(&self, auction_id: AuctionId) -> usize {
        self.topics
            .read()
            .get(&auction_id)
            .map(|t| t.subscribers.lock().len())
            .unwrap_or(0)
    }
}

/// Ordered, lazy stream of events for one subscriber.
///
/// Dropping the stream marks the subscriber disconnected; the publisher
/// prunes it on the next publish.
pub struct EventStream<E> {
    auction_id: AuctionId,
    subscriber_id: SubscriberId,
    queue: Arc<SubscriberQueue<E>>,
}

impl<E> EventStream<E> {
    /// Receive the next event; `None` once disconnected and drained.
    pub async fn recv(&mut self) -> Option<E> {
        self.queue.recv().await
    }

    pub fn auction_id(&self) -> AuctionId {
        self.auction_id
    }

    pub fn subscriber_id(&self) -> SubscriberId {
        self.subscriber_id
    }

    /// Events dropped for this subscriber under the drop-oldest policy.
    pub fn dropped(&self) -> u64 {
        self.queue.dropped()
    }

    /// Events currently buffered.
    pub fn depth(&self) -> usize {
        self.queue.depth()
    }
}

impl<E> Drop for EventStream<E> {
    fn drop(&mut self) {
        self.queue.disconnect();
    }
}
