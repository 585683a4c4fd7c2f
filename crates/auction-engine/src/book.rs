//! Per-auction order book
//!
//! The book holds the accepted bids of one auction in acceptance order.
//! Validation rejects any bid that does not strictly beat the current
//! winner, so amounts are strictly increasing through the sequence and
//! the tail entry is always the unique current winner; everything before
//! it has been superseded.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Bid, BidStatus};

/// Ranked set of accepted bids for one auction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    reserve_price: Decimal,
    min_increment: Decimal,
    /// Accepted bids, oldest first; the tail is the current winner
    bids: Vec<Bid>,
}

impl OrderBook {
    pub fn new(reserve_price: Decimal, min_increment: Decimal) -> Self {
        Self {
            reserve_price,
            min_increment,
            bids: Vec::new(),
        }
    }

    /// The unique bid currently holding Accepted status, if any.
    pub fn winning_bid(&self) -> Option<&Bid> {
        self.bids.last()
    }

    /// Smallest admissible next bid: winning amount plus increment, or
    /// the reserve price while the book is empty.
    pub fn minimum_next_bid(&self) -> Decimal {
        match self.bids.last() {
            Some(winner) => winner.amount + self.min_increment,
            None => self.reserve_price,
        }
    }

    /// Admit a validated bid as the new winner.
    ///
    /// The previous winner (if any) transitions to Superseded. Callers
    /// must have validated the bid first: the amount must strictly
    /// exceed the current winning amount.
    pub fn accept(&mut self, mut bid: Bid) -> &Bid {
        debug_assert!(
            self.bids
                .last()
                .map(|winner| bid.amount > winner.amount)
                .unwrap_or(true),
            "accept called with a bid that does not beat the current winner"
        );

        if let Some(previous) = self.bids.last_mut() {
            previous.status = BidStatus::Superseded;
        }
        bid.status = BidStatus::Accepted;
        self.bids.push(bid);
        self.bids.last().expect("book tail exists after push")
    }

    /// All accepted bids in acceptance order (superseded chain + winner).
    pub fn bids(&self) -> &[Bid] {
        &self.bids
    }

    pub fn len(&self) -> usize {
        self.bids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty()
    }

    pub fn reserve_price(&self) -> Decimal {
        self.reserve_price
    }

    pub fn min_increment(&self) -> Decimal {
        self.min_increment
    }
}
