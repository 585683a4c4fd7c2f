//! Identifier newtypes used across OpenBid
//!
//! Every identifier is a UUID wrapped in its own type so that an
//! auction id can never be passed where a bidder id is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for auctions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuctionId(pub Uuid);

impl AuctionId {
    /// Create a new random AuctionId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an AuctionId from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AuctionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AuctionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for bids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BidId(pub Uuid);

impl BidId {
    /// Create a new random BidId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a BidId from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for BidId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BidId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for bidders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BidderId(pub Uuid);

impl BidderId {
    /// Create a new random BidderId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a BidderId from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for BidderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BidderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for event-stream subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriberId(pub Uuid);

impl SubscriberId {
    /// Create a new random SubscriberId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auction_id_uniqueness() {
        let id1 = AuctionId::new();
        let id2 = AuctionId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_id_round_trips_through_uuid() {
        let id = BidId::new();
        assert_eq!(BidId::from_uuid(id.0), id);
    }
}
