//! Settlement service for OpenBid
//!
//! After an auction closes, settlement finalizes the outcome: the
//! settlement record (winner and hammer price) is persisted, then the
//! engine transitions the auction to Settled and broadcasts
//! AuctionSettled. A persistence failure is reported in the outcome but
//! does not block the in-memory transition; the engine's state stays
//! authoritative.

pub mod error;

pub use error::SettlementError;

use std::sync::Arc;
use tracing::{info, warn};

use auction_engine::store::AuctionStore;
use auction_engine::{AuctionEngine, AuctionEvent, Clock, SettlementRecord};
use common::AuctionId;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, SettlementError>;

/// Outcome of settling one auction.
#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    pub record: SettlementRecord,
    /// Whether the record reached the store
    pub persisted: bool,
    /// The AuctionSettled broadcast event
    pub event: AuctionEvent,
}

/// Finalizes closed auctions.
pub struct Settler {
    engine: Arc<AuctionEngine>,
    store: Arc<dyn AuctionStore>,
    clock: Arc<dyn Clock>,
}

impl Settler {
    pub fn new(
        engine: Arc<AuctionEngine>,
        store: Arc<dyn AuctionStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            engine,
            store,
            clock,
        }
    }

    /// Settle a closed auction.
    ///
    /// Persists the outcome first, then drives the Settled transition.
    /// Fails only if the engine refuses the transition (the auction is
    /// unknown or not closed).
    pub async fn settle(&self, auction_id: AuctionId) -> Result<SettlementOutcome> {
        let (auction, winner) = self.engine.outcome(auction_id).await?;

        let record = SettlementRecord {
            auction_id,
            item: auction.item.clone(),
            winning_bid: winner.as_ref().map(|b| b.id),
            winning_bidder: winner.as_ref().map(|b| b.bidder),
            hammer_price: winner.as_ref().map(|b| b.amount),
            settled_at: self.clock.now(),
        };

        let persisted = match self.store.persist_settlement(&record).await {
            Ok(()) => true,
            Err(error) => {
                warn!(%auction_id, %error, "Failed to persist settlement record");
                false
            }
        };

        let event = self.engine.mark_settled(auction_id).await?;

        info!(
            %auction_id,
            winner = ?record.winning_bidder,
            hammer_price = ?record.hammer_price,
            persisted,
            "Auction settlement complete"
        );

        Ok(SettlementOutcome {
            record,
            persisted,
            event,
        })
    }
}
