//! The matching engine
//!
//! One cell per auction; each cell's `tokio::sync::Mutex` is the
//! exclusive mutation boundary required by the concurrency model: a
//! submission may wait only while acquiring it, and no await happens
//! while it is held. Status checks, validation, book mutation, sequence
//! assignment, and publication all happen inside that boundary, so the
//! close/accept race resolves deterministically and subscribers observe
//! events in sequence order. Different auctions share nothing and
//! proceed fully in parallel.

use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use common::{AuctionId, BidderId};
use dispatch::{Dispatcher, EventStream};

use crate::book::OrderBook;
use crate::clock::Clock;
use crate::domain::{Auction, AuctionSpec, AuctionStatus, Bid, SchedulingDefaults};
use crate::error::EngineError;
use crate::event::{AuctionEvent, EventKind};
use crate::log::EventLog;
use crate::metrics::{EngineMetrics, MetricsSnapshot};
use crate::result::SubmitOutcome;
use crate::store::AuctionStore;
use crate::validator::validate;
use crate::Result;

/// Time-driven transition applied by one lifecycle poll of an auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedTransition {
    None,
    Opened,
    Closed,
    /// Both deadlines had passed: opened and closed within one poll
    OpenedAndClosed,
}

/// Read-only view of one auction's current state.
#[derive(Debug, Clone)]
pub struct AuctionSnapshot {
    pub auction: Auction,
    pub winning_bid: Option<Bid>,
    pub minimum_next_bid: Decimal,
    /// Latest broadcast sequence
    pub sequence: u64,
}

struct AuctionState {
    auction: Auction,
    book: OrderBook,
    log: EventLog,
    /// Arrival counter for server-assigned submission ordering
    submission_counter: u64,
}

struct AuctionCell {
    state: tokio::sync::Mutex<AuctionState>,
}

/// The auction matching engine.
pub struct AuctionEngine {
    cells: RwLock<HashMap<AuctionId, Arc<AuctionCell>>>,
    dispatcher: Arc<Dispatcher<AuctionEvent>>,
    store: Arc<dyn AuctionStore>,
    clock: Arc<dyn Clock>,
    defaults: SchedulingDefaults,
    metrics: Arc<EngineMetrics>,
}

impl AuctionEngine {
    pub fn new(
        dispatcher: Arc<Dispatcher<AuctionEvent>>,
        store: Arc<dyn AuctionStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_defaults(dispatcher, store, clock, SchedulingDefaults::default())
    }

    /// Create an engine with configured pricing defaults for auctions
    /// scheduled without their own.
    pub fn with_defaults(
        dispatcher: Arc<Dispatcher<AuctionEvent>>,
        store: Arc<dyn AuctionStore>,
        clock: Arc<dyn Clock>,
        defaults: SchedulingDefaults,
    ) -> Self {
        Self {
            cells: RwLock::new(HashMap::new()),
            dispatcher,
            store,
            clock,
            defaults,
            metrics: Arc::new(EngineMetrics::new()),
        }
    }

    /// Register a new auction in Scheduled state.
    pub async fn schedule(&self, spec: AuctionSpec) -> Result<AuctionId> {
        if spec.item.trim().is_empty() {
            return Err(EngineError::InvalidSpec("item must not be empty".into()));
        }
        if spec.closes_at <= spec.opens_at {
            return Err(EngineError::InvalidSpec(
                "closes_at must be after opens_at".into(),
            ));
        }

        let auction_id = AuctionId::new();
        let auction = Auction::from_spec(auction_id, spec, &self.defaults);
        if auction.min_increment < Decimal::ZERO {
            return Err(EngineError::InvalidSpec(
                "min_increment must not be negative".into(),
            ));
        }
        if auction.reserve_price < Decimal::ZERO {
            return Err(EngineError::InvalidSpec(
                "reserve_price must not be negative".into(),
            ));
        }
        let book = OrderBook::new(auction.reserve_price, auction.min_increment);
        let cell = Arc::new(AuctionCell {
            state: tokio::sync::Mutex::new(AuctionState {
                auction: auction.clone(),
                book,
                log: EventLog::new(),
                submission_counter: 0,
            }),
        });
        self.cells.write().insert(auction_id, cell);

        info!(
            %auction_id,
            item = %auction.item,
            opens_at = %auction.opens_at,
            closes_at = %auction.closes_at,
            "Auction scheduled"
        );

        self.persist_auction(&auction).await;
        Ok(auction_id)
    }

    /// Submit a bid.
    ///
    /// The only suspension point before the decision is acquiring the
    /// per-auction lock; dropping the returned future before then leaves
    /// no trace, and once the lock is held the mutation runs to
    /// completion without awaiting.
    pub async fn submit(
        &self,
        auction_id: AuctionId,
        bidder: BidderId,
        amount: Decimal,
    ) -> Result<SubmitOutcome> {
        let start = Instant::now();
        self.metrics.record_bid_received();
        let cell = self.cell(auction_id)?;

        let (outcome, accepted_bid) = {
            let mut state = cell.state.lock().await;
            let now = self.clock.now();
            state.submission_counter += 1;
            let bid = Bid::new(auction_id, bidder, amount, now, state.submission_counter);

            match validate(&state.auction, &state.book, &bid) {
                Err(reason) => {
                    self.metrics.record_bid_rejected();
                    debug!(%auction_id, %bidder, %amount, %reason, "Bid rejected");
                    let event = AuctionEvent {
                        auction_id,
                        sequence: state.log.sequence(),
                        at: now,
                        kind: EventKind::BidRejected {
                            bidder,
                            amount,
                            reason: reason.clone(),
                        },
                    };
                    (SubmitOutcome::Rejected { reason, event }, None)
                }
                Ok(()) => {
                    let sequence = state.log.sequence() + 1;
                    let accepted = state.book.accept(bid).clone();
                    state.auction.winning_bid = Some(accepted.id);

                    let event = AuctionEvent {
                        auction_id,
                        sequence,
                        at: now,
                        kind: EventKind::BidAccepted {
                            bid_id: accepted.id,
                            bidder,
                            amount,
                            minimum_next_bid: state.book.minimum_next_bid(),
                        },
                    };
                    state.log.append(event.clone());
                    self.dispatcher.publish(auction_id, &event);
                    self.metrics.record_bid_accepted();

                    info!(
                        %auction_id,
                        %bidder,
                        %amount,
                        sequence,
                        "Bid accepted as new winner"
                    );
                    (
                        SubmitOutcome::Accepted {
                            bid_id: accepted.id,
                            event,
                        },
                        Some(accepted),
                    )
                }
            }
        };

        if let Some(bid) = accepted_bid {
            self.persist_bid(&bid).await;
            self.persist_event(outcome.event()).await;
        }
        self.metrics.record_submit_latency(start.elapsed());
        Ok(outcome)
    }

    /// Open a scheduled auction now (manual trigger).
    pub async fn open(&self, auction_id: AuctionId) -> Result<()> {
        let cell = self.cell(auction_id)?;
        let auction = {
            let mut state = cell.state.lock().await;
            match state.auction.status {
                AuctionStatus::Scheduled => {
                    self.open_locked(&mut state);
                    state.auction.clone()
                }
                from => {
                    return Err(EngineError::InvalidTransition {
                        auction_id,
                        from,
                        to: AuctionStatus::Open,
                    })
                }
            }
        };
        self.persist_auction(&auction).await;
        Ok(())
    }

    /// Close an open auction now (manual trigger or deadline).
    ///
    /// Returns the AuctionClosed event. Closing an already-closed
    /// auction is a no-op returning `None`.
    pub async fn close(&self, auction_id: AuctionId) -> Result<Option<AuctionEvent>> {
        let cell = self.cell(auction_id)?;
        let (auction, event) = {
            let mut state = cell.state.lock().await;
            match state.auction.status {
                AuctionStatus::Open => {
                    let event = self.close_locked(&mut state);
                    (state.auction.clone(), event)
                }
                AuctionStatus::Closed => return Ok(None),
                from => {
                    return Err(EngineError::InvalidTransition {
                        auction_id,
                        from,
                        to: AuctionStatus::Closed,
                    })
                }
            }
        };
        self.persist_auction(&auction).await;
        self.persist_event(&event).await;
        Ok(Some(event))
    }

    /// Finalize a closed auction (called by settlement after the outcome
    /// is recorded). Emits AuctionSettled; the auction is immutable
    /// afterwards.
    pub async fn mark_settled(&self, auction_id: AuctionId) -> Result<AuctionEvent> {
        let cell = self.cell(auction_id)?;
        let (auction, event) = {
            let mut state = cell.state.lock().await;
            match state.auction.status {
                AuctionStatus::Closed => {
                    let now = self.clock.now();
                    let sequence = state.log.sequence() + 1;
                    let winner = state.book.winning_bid();
                    let event = AuctionEvent {
                        auction_id,
                        sequence,
                        at: now,
                        kind: EventKind::AuctionSettled {
                            winning_bid: winner.map(|b| b.id),
                            winning_bidder: winner.map(|b| b.bidder),
                            hammer_price: winner.map(|b| b.amount),
                        },
                    };
                    state.auction.status = AuctionStatus::Settled;
                    state.log.append(event.clone());
                    self.dispatcher.publish(auction_id, &event);
                    self.metrics.record_auction_settled();
                    info!(%auction_id, sequence, "Auction settled");
                    (state.auction.clone(), event)
                }
                from => {
                    return Err(EngineError::InvalidTransition {
                        auction_id,
                        from,
                        to: AuctionStatus::Settled,
                    })
                }
            }
        };
        self.persist_auction(&auction).await;
        self.persist_event(&event).await;
        // No further events can follow; end remaining streams
        self.dispatcher.close_topic(auction_id);
        Ok(event)
    }

    /// Apply any transitions whose deadline has passed.
    ///
    /// Both the open and close checks run inside the auction's mutation
    /// boundary, so a deadline close cannot interleave with an in-flight
    /// acceptance.
    pub async fn apply_due_transitions(
        &self,
        auction_id: AuctionId,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<TimedTransition> {
        let cell = self.cell(auction_id)?;
        let (transition, auction, event) = {
            let mut state = cell.state.lock().await;
            let mut opened = false;

            if state.auction.status == AuctionStatus::Scheduled && now >= state.auction.opens_at {
                self.open_locked(&mut state);
                opened = true;
            }

            if state.auction.status == AuctionStatus::Open && now >= state.auction.closes_at {
                let event = self.close_locked(&mut state);
                let transition = if opened {
                    TimedTransition::OpenedAndClosed
                } else {
                    TimedTransition::Closed
                };
                (transition, Some(state.auction.clone()), Some(event))
            } else if opened {
                (TimedTransition::Opened, Some(state.auction.clone()), None)
            } else {
                (TimedTransition::None, None, None)
            }
        };

        if let Some(auction) = auction {
            self.persist_auction(&auction).await;
        }
        if let Some(event) = event {
            self.persist_event(&event).await;
        }
        Ok(transition)
    }

    /// Subscribe to an auction's event stream.
    ///
    /// The snapshot is taken and the subscriber registered under the
    /// auction's lock, so the synthetic first event and all subsequent
    /// broadcasts form a gap-free sequence.
    pub async fn subscribe(&self, auction_id: AuctionId) -> Result<EventStream<AuctionEvent>> {
        let cell = self.cell(auction_id)?;
        let state = cell.state.lock().await;
        let winner = state.book.winning_bid();
        let snapshot = AuctionEvent {
            auction_id,
            sequence: state.log.sequence(),
            at: self.clock.now(),
            kind: EventKind::Snapshot {
                status: state.auction.status,
                winning_bidder: winner.map(|b| b.bidder),
                winning_amount: winner.map(|b| b.amount),
                minimum_next_bid: state.book.minimum_next_bid(),
            },
        };
        Ok(self.dispatcher.subscribe(auction_id, Some(snapshot)))
    }

    /// Current state of an auction.
    pub async fn snapshot(&self, auction_id: AuctionId) -> Result<AuctionSnapshot> {
        let cell = self.cell(auction_id)?;
        let state = cell.state.lock().await;
        Ok(AuctionSnapshot {
            auction: state.auction.clone(),
            winning_bid: state.book.winning_bid().cloned(),
            minimum_next_bid: state.book.minimum_next_bid(),
            sequence: state.log.sequence(),
        })
    }

    /// The auction row and its winning bid (used by settlement).
    pub async fn outcome(&self, auction_id: AuctionId) -> Result<(Auction, Option<Bid>)> {
        let cell = self.cell(auction_id)?;
        let state = cell.state.lock().await;
        Ok((state.auction.clone(), state.book.winning_bid().cloned()))
    }

    /// Recorded broadcast events with sequence >= `from_sequence`.
    pub async fn events_from(
        &self,
        auction_id: AuctionId,
        from_sequence: u64,
    ) -> Result<Vec<AuctionEvent>> {
        let cell = self.cell(auction_id)?;
        let state = cell.state.lock().await;
        Ok(state.log.get_from(from_sequence))
    }

    /// Ids of all registered auctions.
    pub fn auction_ids(&self) -> Vec<AuctionId> {
        self.cells.read().keys().copied().collect()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn cell(&self, auction_id: AuctionId) -> Result<Arc<AuctionCell>> {
        self.cells
            .read()
            .get(&auction_id)
            .cloned()
            .ok_or(EngineError::UnknownAuction(auction_id))
    }

    fn open_locked(&self, state: &mut AuctionState) {
        state.auction.status = AuctionStatus::Open;
        self.metrics.auction_opened();
        info!(auction_id = %state.auction.id, item = %state.auction.item, "Auction open");
    }

    fn close_locked(&self, state: &mut AuctionState) -> AuctionEvent {
        let now = self.clock.now();
        let sequence = state.log.sequence() + 1;
        let winner = state.book.winning_bid();
        let event = AuctionEvent {
            auction_id: state.auction.id,
            sequence,
            at: now,
            kind: EventKind::AuctionClosed {
                winning_bid: winner.map(|b| b.id),
                winning_bidder: winner.map(|b| b.bidder),
                winning_amount: winner.map(|b| b.amount),
            },
        };
        state.auction.status = AuctionStatus::Closed;
        state.log.append(event.clone());
        self.dispatcher.publish(state.auction.id, &event);
        self.metrics.auction_closed();
        info!(
            auction_id = %state.auction.id,
            sequence,
            winner = ?winner.map(|b| b.bidder),
            "Auction closed"
        );
        event
    }

    async fn persist_auction(&self, auction: &Auction) {
        if let Err(error) = self.store.persist_auction(auction).await {
            warn!(auction_id = %auction.id, %error, "Failed to persist auction");
        }
    }

    async fn persist_bid(&self, bid: &Bid) {
        if let Err(error) = self.store.persist_bid(bid).await {
            warn!(auction_id = %bid.auction_id, bid_id = %bid.id, %error, "Failed to persist bid");
        }
    }

    async fn persist_event(&self, event: &AuctionEvent) {
        if let Err(error) = self.store.persist_event(event).await {
            warn!(
                auction_id = %event.auction_id,
                sequence = event.sequence,
                %error,
                "Failed to persist event"
            );
        }
    }
}

// Keep status fields visible for the Debug builds used in tests
impl std::fmt::Debug for AuctionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuctionEngine")
            .field("auctions", &self.cells.read().len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
