//! Auction lifecycle management
//!
//! Scheduled -> Open -> Closed transitions are time-driven: the manager
//! polls the injectable clock and asks the engine to apply any due
//! transitions. The status writes happen inside the same per-auction
//! mutation boundary as bid acceptance, so a deadline close can never
//! interleave with an in-flight accept. Closed -> Settled is driven by
//! the settlement service once the outcome is recorded.

use std::sync::Arc;
use tracing::warn;

use common::AuctionId;

use crate::clock::Clock;
use crate::engine::{AuctionEngine, TimedTransition};

/// Transitions applied by one poll.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub opened: Vec<AuctionId>,
    /// Closed this tick; settlement is due for these
    pub closed: Vec<AuctionId>,
}

/// Drives time-based auction transitions through the engine.
pub struct LifecycleManager {
    engine: Arc<AuctionEngine>,
    clock: Arc<dyn Clock>,
}

impl LifecycleManager {
    pub fn new(engine: Arc<AuctionEngine>, clock: Arc<dyn Clock>) -> Self {
        Self { engine, clock }
    }

    /// Apply all due transitions once, returning what changed.
    pub async fn poll(&self) -> TickReport {
        let now = self.clock.now();
        let mut report = TickReport::default();

        for auction_id in self.engine.auction_ids() {
            match self.engine.apply_due_transitions(auction_id, now).await {
                Ok(TimedTransition::None) => {}
                Ok(TimedTransition::Opened) => report.opened.push(auction_id),
                Ok(TimedTransition::Closed) => report.closed.push(auction_id),
                Ok(TimedTransition::OpenedAndClosed) => {
                    report.opened.push(auction_id);
                    report.closed.push(auction_id);
                }
                Err(error) => {
                    // one auction's failure must not affect the others
                    warn!(%auction_id, %error, "Lifecycle poll failed for auction");
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::domain::AuctionSpec;
    use crate::store::{AuctionStore, MemoryStore};
    use crate::validator::RejectReason;
    use chrono::{Duration, Utc};
    use common::BidderId;
    use dispatch::{DispatchConfig, Dispatcher};
    use rust_decimal::Decimal;

    fn harness() -> (Arc<AuctionEngine>, Arc<ManualClock>, LifecycleManager) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = Arc::new(MemoryStore::new());
        let dispatcher = Arc::new(Dispatcher::new(DispatchConfig::default()));
        let engine = Arc::new(AuctionEngine::new(
            dispatcher,
            store as Arc<dyn AuctionStore>,
            Arc::clone(&clock) as Arc<dyn Clock>,
        ));
        let lifecycle = LifecycleManager::new(Arc::clone(&engine), Arc::clone(&clock) as _);
        (engine, clock, lifecycle)
    }

    fn spec_in(clock: &ManualClock, opens_in: Duration, closes_in: Duration) -> AuctionSpec {
        AuctionSpec {
            item: "lot 9".to_string(),
            opens_at: clock.now() + opens_in,
            closes_at: clock.now() + closes_in,
            min_increment: Some(Decimal::from(5)),
            reserve_price: Some(Decimal::from(100)),
        }
    }

    #[tokio::test]
    async fn test_opens_then_closes_at_deadlines() {
        let (engine, clock, lifecycle) = harness();
        let auction = engine
            .schedule(spec_in(&clock, Duration::minutes(1), Duration::minutes(10)))
            .await
            .unwrap();

        // nothing due yet
        assert_eq!(lifecycle.poll().await, TickReport::default());

        // bids before open are rejected
        let outcome = engine
            .submit(auction, BidderId::new(), Decimal::from(200))
            .await
            .unwrap();
        assert_eq!(outcome.reject_reason(), Some(&RejectReason::AuctionNotOpen));

        clock.advance(Duration::minutes(2));
        let report = lifecycle.poll().await;
        assert_eq!(report.opened, vec![auction]);
        assert!(report.closed.is_empty());

        // open now: bids admitted
        let outcome = engine
            .submit(auction, BidderId::new(), Decimal::from(200))
            .await
            .unwrap();
        assert!(outcome.is_accepted());

        clock.advance(Duration::minutes(10));
        let report = lifecycle.poll().await;
        assert_eq!(report.closed, vec![auction]);

        // closed: no bid is ever accepted again
        let outcome = engine
            .submit(auction, BidderId::new(), Decimal::from(500))
            .await
            .unwrap();
        assert_eq!(outcome.reject_reason(), Some(&RejectReason::AuctionNotOpen));
    }

    #[tokio::test]
    async fn test_both_deadlines_past_opens_and_closes_in_one_poll() {
        let (engine, clock, lifecycle) = harness();
        let auction = engine
            .schedule(spec_in(&clock, Duration::minutes(1), Duration::minutes(2)))
            .await
            .unwrap();

        clock.advance(Duration::minutes(5));
        let report = lifecycle.poll().await;
        assert_eq!(report.opened, vec![auction]);
        assert_eq!(report.closed, vec![auction]);
    }

    #[tokio::test]
    async fn test_poll_is_idempotent_between_deadlines() {
        let (engine, clock, lifecycle) = harness();
        let auction = engine
            .schedule(spec_in(&clock, Duration::minutes(1), Duration::minutes(10)))
            .await
            .unwrap();

        clock.advance(Duration::minutes(2));
        assert_eq!(lifecycle.poll().await.opened, vec![auction]);
        // second poll applies nothing new
        assert_eq!(lifecycle.poll().await, TickReport::default());
    }

    #[tokio::test]
    async fn test_auctions_close_independently() {
        let (engine, clock, lifecycle) = harness();
        let early = engine
            .schedule(spec_in(&clock, Duration::zero(), Duration::minutes(1)))
            .await
            .unwrap();
        let late = engine
            .schedule(spec_in(&clock, Duration::zero(), Duration::minutes(30)))
            .await
            .unwrap();

        clock.advance(Duration::seconds(1));
        lifecycle.poll().await;

        clock.advance(Duration::minutes(2));
        let report = lifecycle.poll().await;
        assert_eq!(report.closed, vec![early]);

        // the late auction still accepts bids
        let outcome = engine
            .submit(late, BidderId::new(), Decimal::from(200))
            .await
            .unwrap();
        assert!(outcome.is_accepted());
    }
}
