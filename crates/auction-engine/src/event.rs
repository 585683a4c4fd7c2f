//! Event types for the auction core
//!
//! Broadcast events (BidAccepted, AuctionClosed, AuctionSettled) consume
//! the per-auction sequence, which is gapless and strictly increasing.
//! BidRejected is delivered only to the submitter and Snapshot is the
//! synthetic first event of a new subscription; both carry the latest
//! broadcast sequence instead of consuming one, so subscriber streams
//! stay gap-free.

use chrono::{DateTime, Utc};
use common::{AuctionId, BidId, BidderId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::AuctionStatus;
use crate::validator::RejectReason;

/// A sequence-numbered notification of an auction state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionEvent {
    pub auction_id: AuctionId,
    pub sequence: u64,
    pub at: DateTime<Utc>,
    pub kind: EventKind,
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// A bid was admitted and is the new winner
    BidAccepted {
        bid_id: BidId,
        bidder: BidderId,
        amount: Decimal,
        /// The minimum the next bid must reach
        minimum_next_bid: Decimal,
    },

    /// A bid was refused; delivered only to the submitter
    BidRejected {
        bidder: BidderId,
        amount: Decimal,
        reason: RejectReason,
    },

    /// The auction stopped accepting bids
    AuctionClosed {
        winning_bid: Option<BidId>,
        winning_bidder: Option<BidderId>,
        winning_amount: Option<Decimal>,
    },

    /// The outcome was finalized
    AuctionSettled {
        winning_bid: Option<BidId>,
        winning_bidder: Option<BidderId>,
        hammer_price: Option<Decimal>,
    },

    /// Synthetic first event of a new subscription
    Snapshot {
        status: AuctionStatus,
        winning_bidder: Option<BidderId>,
        winning_amount: Option<Decimal>,
        minimum_next_bid: Decimal,
    },
}

impl AuctionEvent {
    /// Whether this event kind consumes a broadcast sequence number and
    /// is fanned out to all subscribers.
    pub fn is_broadcast(&self) -> bool {
        matches!(
            self.kind,
            EventKind::BidAccepted { .. }
                | EventKind::AuctionClosed { .. }
                | EventKind::AuctionSettled { .. }
        )
    }
}
