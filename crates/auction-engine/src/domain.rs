//! Domain types for the auction core
//!
//! These types are shared across the engine, the stores, and the
//! settlement service.

use chrono::{DateTime, Utc};
use common::{AuctionId, BidId, BidderId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Auction Status
// ============================================================================

/// Lifecycle state of an auction.
///
/// Transitions are one-way: Scheduled -> Open -> Closed -> Settled.
/// Closed is terminal for bid acceptance; Settled is terminal outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionStatus {
    /// Created but not yet accepting bids
    Scheduled,
    /// Accepting bids
    Open,
    /// No longer accepting bids, awaiting settlement
    Closed,
    /// Outcome finalized; the auction is immutable
    Settled,
}

impl AuctionStatus {
    /// Returns true while bids may be admitted
    pub fn accepts_bids(&self) -> bool {
        matches!(self, AuctionStatus::Open)
    }

    /// Returns true once no further transition is possible
    pub fn is_settled(&self) -> bool {
        matches!(self, AuctionStatus::Settled)
    }
}

impl std::fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuctionStatus::Scheduled => write!(f, "scheduled"),
            AuctionStatus::Open => write!(f, "open"),
            AuctionStatus::Closed => write!(f, "closed"),
            AuctionStatus::Settled => write!(f, "settled"),
        }
    }
}

// ============================================================================
// Bid Status
// ============================================================================

/// Status of a bid. Transitions are one-way; no bid returns to Pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    /// Created, not yet decided
    Pending,
    /// Admitted to the book; the current winner until superseded
    Accepted,
    /// Refused by validation
    Rejected,
    /// Was the winner, displaced by a higher accepted bid
    Superseded,
}

impl std::fmt::Display for BidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BidStatus::Pending => write!(f, "pending"),
            BidStatus::Accepted => write!(f, "accepted"),
            BidStatus::Rejected => write!(f, "rejected"),
            BidStatus::Superseded => write!(f, "superseded"),
        }
    }
}

// ============================================================================
// Auction
// ============================================================================

/// Pricing policy applied when a spec does not set its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulingDefaults {
    /// Minimum amount a new bid must exceed the current winner by
    pub min_increment: Decimal,
    /// Lowest admissible first bid
    pub reserve_price: Decimal,
}

impl Default for SchedulingDefaults {
    fn default() -> Self {
        Self {
            min_increment: Decimal::ONE,
            reserve_price: Decimal::ZERO,
        }
    }
}

/// Input for scheduling a new auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionSpec {
    /// Human-readable item descriptor
    pub item: String,
    /// When bidding opens
    pub opens_at: DateTime<Utc>,
    /// When bidding closes
    pub closes_at: DateTime<Utc>,
    /// Overrides the configured default increment when set
    pub min_increment: Option<Decimal>,
    /// Overrides the configured default reserve when set
    pub reserve_price: Option<Decimal>,
}

/// A time-bounded competition for one item.
///
/// Mutated only by the lifecycle manager and the matching engine, both
/// inside the per-auction mutation boundary. Immutable once Settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Auction {
    pub id: AuctionId,
    pub item: String,
    pub status: AuctionStatus,
    pub opens_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
    pub min_increment: Decimal,
    pub reserve_price: Decimal,
    /// The currently winning bid, if any
    pub winning_bid: Option<BidId>,
}

impl Auction {
    /// Create a scheduled auction from a spec, filling unset pricing
    /// policy from the defaults.
    pub fn from_spec(id: AuctionId, spec: AuctionSpec, defaults: &SchedulingDefaults) -> Self {
        Self {
            id,
            item: spec.item,
            status: AuctionStatus::Scheduled,
            opens_at: spec.opens_at,
            closes_at: spec.closes_at,
            min_increment: spec.min_increment.unwrap_or(defaults.min_increment),
            reserve_price: spec.reserve_price.unwrap_or(defaults.reserve_price),
            winning_bid: None,
        }
    }
}

// ============================================================================
// Bid
// ============================================================================

/// A timestamped monetary offer against an auction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    pub auction_id: AuctionId,
    pub bidder: BidderId,
    pub amount: Decimal,
    /// Server-assigned submission time
    pub submitted_at: DateTime<Utc>,
    /// Server-assigned per-auction arrival counter; the tie-break clock
    pub submission_seq: u64,
    pub status: BidStatus,
}

impl Bid {
    /// Create a new pending bid
    pub fn new(
        auction_id: AuctionId,
        bidder: BidderId,
        amount: Decimal,
        submitted_at: DateTime<Utc>,
        submission_seq: u64,
    ) -> Self {
        Self {
            id: BidId::new(),
            auction_id,
            bidder,
            amount,
            submitted_at,
            submission_seq,
            status: BidStatus::Pending,
        }
    }
}

// ============================================================================
// Settlement
// ============================================================================

/// Final record of a settled auction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub auction_id: AuctionId,
    pub item: String,
    pub winning_bid: Option<BidId>,
    pub winning_bidder: Option<BidderId>,
    /// The winning amount at close, if any bid was accepted
    pub hammer_price: Option<Decimal>,
    pub settled_at: DateTime<Utc>,
}
