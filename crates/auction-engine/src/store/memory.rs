//! In-memory store implementation
//!
//! Fast and non-durable; everything is lost on restart. Keeps a bounded
//! number of recent bids per auction.

use async_trait::async_trait;
use common::AuctionId;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::{Auction, Bid, SettlementRecord};
use crate::event::AuctionEvent;
use crate::store::traits::{AuctionStore, StoreResult};

/// In-memory persistence for auctions, bids, events, and settlements.
pub struct MemoryStore {
    auctions: RwLock<HashMap<AuctionId, Auction>>,
    bids: RwLock<HashMap<AuctionId, Vec<Bid>>>,
    events: RwLock<HashMap<AuctionId, Vec<AuctionEvent>>>,
    settlements: RwLock<HashMap<AuctionId, SettlementRecord>>,
    max_bids_per_auction: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_retention(1000)
    }

    /// Create a store that retains at most `max_bids_per_auction` bids
    /// per auction.
    pub fn with_retention(max_bids_per_auction: usize) -> Self {
        Self {
            auctions: RwLock::new(HashMap::new()),
            bids: RwLock::new(HashMap::new()),
            events: RwLock::new(HashMap::new()),
            settlements: RwLock::new(HashMap::new()),
            max_bids_per_auction,
        }
    }

    /// The recorded auction row, if any (query helper for tests/ops).
    pub async fn auction(&self, auction_id: AuctionId) -> Option<Auction> {
        self.auctions.read().await.get(&auction_id).cloned()
    }

    /// The recorded settlement, if any.
    pub async fn settlement(&self, auction_id: AuctionId) -> Option<SettlementRecord> {
        self.settlements.read().await.get(&auction_id).cloned()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuctionStore for MemoryStore {
    async fn persist_auction(&self, auction: &Auction) -> StoreResult<()> {
        self.auctions
            .write()
            .await
            .insert(auction.id, auction.clone());
        Ok(())
    }

    async fn persist_bid(&self, bid: &Bid) -> StoreResult<()> {
        let mut bids = self.bids.write().await;
        let auction_bids = bids.entry(bid.auction_id).or_default();
        auction_bids.push(bid.clone());

        // Trim to retention bound
        while auction_bids.len() > self.max_bids_per_auction {
            auction_bids.remove(0);
        }
        Ok(())
    }

    async fn persist_event(&self, event: &AuctionEvent) -> StoreResult<()> {
        self.events
            .write()
            .await
            .entry(event.auction_id)
            .or_default()
            .push(event.clone());
        Ok(())
    }

    async fn persist_settlement(&self, record: &SettlementRecord) -> StoreResult<()> {
        self.settlements
            .write()
            .await
            .insert(record.auction_id, record.clone());
        Ok(())
    }

    async fn events(
        &self,
        auction_id: AuctionId,
        from_sequence: u64,
    ) -> StoreResult<Vec<AuctionEvent>> {
        let events = self.events.read().await;
        Ok(events
            .get(&auction_id)
            .map(|list| {
                list.iter()
                    .filter(|e| e.sequence >= from_sequence)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn recent_bids(&self, auction_id: AuctionId, limit: usize) -> StoreResult<Vec<Bid>> {
        let bids = self.bids.read().await;
        Ok(bids
            .get(&auction_id)
            .map(|list| list.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}
