//! Bid admission checks
//!
//! Validation is side-effect-free: it inspects the auction and its book
//! and either clears the bid for acceptance or names the specific
//! rejection reason. The engine runs it inside the per-auction mutation
//! boundary, so the state it sees is the state the bid is applied to.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::book::OrderBook;
use crate::domain::{Auction, Bid};

/// Why a bid was refused.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The auction is not currently accepting bids
    #[error("auction is not open for bidding")]
    AuctionNotOpen,

    /// Amounts must be strictly positive
    #[error("bid amount must be positive")]
    NonPositiveAmount,

    /// The bidder already holds the winning bid
    #[error("bidder already holds the current winning bid")]
    SelfOutbid,

    /// Equal-amount bids lose to the earlier-submitted winner
    #[error("bid ties the current winning amount; the earlier bid wins")]
    TiedWithWinner,

    /// Below the winning amount plus increment (or the reserve)
    #[error("bid of {amount} is below the minimum next bid of {minimum}")]
    BelowMinimum { amount: Decimal, minimum: Decimal },
}

/// Check a bid against the auction state it would be applied to.
///
/// The tie check runs before the minimum check so the reason stays
/// specific when the increment is zero.
pub fn validate(auction: &Auction, book: &OrderBook, bid: &Bid) -> Result<(), RejectReason> {
    if !auction.status.accepts_bids() {
        return Err(RejectReason::AuctionNotOpen);
    }
    if bid.amount <= Decimal::ZERO {
        return Err(RejectReason::NonPositiveAmount);
    }
    if let Some(winner) = book.winning_bid() {
        if winner.bidder == bid.bidder {
            return Err(RejectReason::SelfOutbid);
        }
        if winner.amount == bid.amount {
            return Err(RejectReason::TiedWithWinner);
        }
    }
    let minimum = book.minimum_next_bid();
    if bid.amount < minimum {
        return Err(RejectReason::BelowMinimum {
            amount: bid.amount,
            minimum,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuctionSpec, AuctionStatus, SchedulingDefaults};
    use chrono::Utc;
    use common::{AuctionId, BidderId};

    fn open_auction(reserve: i64, increment: i64) -> Auction {
        let mut auction = Auction::from_spec(
            AuctionId::new(),
            AuctionSpec {
                item: "lot".to_string(),
                opens_at: Utc::now(),
                closes_at: Utc::now() + chrono::Duration::hours(1),
                min_increment: Some(Decimal::from(increment)),
                reserve_price: Some(Decimal::from(reserve)),
            },
            &SchedulingDefaults::default(),
        );
        auction.status = AuctionStatus::Open;
        auction
    }

    fn bid_from(auction: &Auction, bidder: BidderId, amount: i64, seq: u64) -> Bid {
        Bid::new(auction.id, bidder, Decimal::from(amount), Utc::now(), seq)
    }

    #[test]
    fn test_rejects_when_not_open() {
        let mut auction = open_auction(100, 5);
        let book = OrderBook::new(auction.reserve_price, auction.min_increment);
        auction.status = AuctionStatus::Closed;

        let bid = bid_from(&auction, BidderId::new(), 200, 1);
        assert_eq!(validate(&auction, &book, &bid), Err(RejectReason::AuctionNotOpen));
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let auction = open_auction(0, 5);
        let book = OrderBook::new(auction.reserve_price, auction.min_increment);

        let bid = bid_from(&auction, BidderId::new(), 0, 1);
        assert_eq!(validate(&auction, &book, &bid), Err(RejectReason::NonPositiveAmount));
    }

    #[test]
    fn test_rejects_below_reserve_on_empty_book() {
        let auction = open_auction(100, 5);
        let book = OrderBook::new(auction.reserve_price, auction.min_increment);

        let bid = bid_from(&auction, BidderId::new(), 90, 1);
        assert_eq!(
            validate(&auction, &book, &bid),
            Err(RejectReason::BelowMinimum {
                amount: Decimal::from(90),
                minimum: Decimal::from(100),
            })
        );
    }

    #[test]
    fn test_rejects_self_outbid() {
        let auction = open_auction(100, 5);
        let mut book = OrderBook::new(auction.reserve_price, auction.min_increment);
        let bidder = BidderId::new();
        book.accept(bid_from(&auction, bidder, 100, 1));

        let raise = bid_from(&auction, bidder, 120, 2);
        assert_eq!(validate(&auction, &book, &raise), Err(RejectReason::SelfOutbid));
    }

    #[test]
    fn test_rejects_equal_amount_as_tie() {
        let auction = open_auction(100, 5);
        let mut book = OrderBook::new(auction.reserve_price, auction.min_increment);
        book.accept(bid_from(&auction, BidderId::new(), 110, 1));

        let tie = bid_from(&auction, BidderId::new(), 110, 2);
        assert_eq!(validate(&auction, &book, &tie), Err(RejectReason::TiedWithWinner));
    }

    #[test]
    fn test_tie_reported_even_with_zero_increment() {
        let auction = open_auction(0, 0);
        let mut book = OrderBook::new(auction.reserve_price, auction.min_increment);
        book.accept(bid_from(&auction, BidderId::new(), 50, 1));

        let tie = bid_from(&auction, BidderId::new(), 50, 2);
        assert_eq!(validate(&auction, &book, &tie), Err(RejectReason::TiedWithWinner));
    }

    #[test]
    fn test_accepts_bid_meeting_minimum() {
        let auction = open_auction(100, 5);
        let mut book = OrderBook::new(auction.reserve_price, auction.min_increment);
        book.accept(bid_from(&auction, BidderId::new(), 100, 1));

        let raise = bid_from(&auction, BidderId::new(), 105, 2);
        assert_eq!(validate(&auction, &book, &raise), Ok(()));
    }
}
