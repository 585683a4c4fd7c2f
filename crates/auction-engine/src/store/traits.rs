//! Store trait for the auction core

use async_trait::async_trait;
use common::AuctionId;

use crate::domain::{Auction, Bid, SettlementRecord};
use crate::event::AuctionEvent;

/// Errors that can occur in the store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("auction not found: {0}")]
    AuctionNotFound(AuctionId),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("store error: {0}")]
    Other(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence collaborator for auctions, bids, events, and settlements.
///
/// Implementations may be slower than in-memory mutation; the engine
/// calls them outside its per-auction critical section and reports
/// failures without blocking winner determination.
#[async_trait]
pub trait AuctionStore: Send + Sync {
    /// Record an auction at scheduling time and on status changes.
    async fn persist_auction(&self, auction: &Auction) -> StoreResult<()>;

    /// Record an accepted bid.
    async fn persist_bid(&self, bid: &Bid) -> StoreResult<()>;

    /// Record a broadcast event.
    async fn persist_event(&self, event: &AuctionEvent) -> StoreResult<()>;

    /// Record the final outcome of a settled auction.
    async fn persist_settlement(&self, record: &SettlementRecord) -> StoreResult<()>;

    /// Recorded events with sequence >= `from_sequence`.
    async fn events(
        &self,
        auction_id: AuctionId,
        from_sequence: u64,
    ) -> StoreResult<Vec<AuctionEvent>>;

    /// Most recently recorded bids for an auction, newest first.
    async fn recent_bids(&self, auction_id: AuctionId, limit: usize) -> StoreResult<Vec<Bid>>;
}
