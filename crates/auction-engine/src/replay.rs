//! Order book recovery from the event log
//!
//! Applying a recorded broadcast event sequence to an empty book
//! reproduces the live book's final state. Rejections and snapshots
//! carry no state and are skipped.

use rust_decimal::Decimal;

use crate::book::OrderBook;
use crate::domain::Bid;
use crate::event::{AuctionEvent, EventKind};

/// Rebuild an order book from a recorded event sequence.
pub fn rebuild_book(
    reserve_price: Decimal,
    min_increment: Decimal,
    events: &[AuctionEvent],
) -> OrderBook {
    let mut book = OrderBook::new(reserve_price, min_increment);
    for event in events {
        if let EventKind::BidAccepted {
            bid_id,
            bidder,
            amount,
            ..
        } = &event.kind
        {
            let mut bid = Bid::new(
                event.auction_id,
                *bidder,
                *amount,
                event.at,
                event.sequence,
            );
            bid.id = *bid_id;
            book.accept(bid);
        }
    }
    book
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::{AuctionId, BidId, BidderId};

    fn accepted(auction_id: AuctionId, sequence: u64, amount: i64) -> AuctionEvent {
        AuctionEvent {
            auction_id,
            sequence,
            at: Utc::now(),
            kind: EventKind::BidAccepted {
                bid_id: BidId::new(),
                bidder: BidderId::new(),
                amount: Decimal::from(amount),
                minimum_next_bid: Decimal::from(amount + 5),
            },
        }
    }

    #[test]
    fn test_replay_rebuilds_winner() {
        let auction_id = AuctionId::new();
        let events = vec![
            accepted(auction_id, 1, 100),
            accepted(auction_id, 2, 110),
            accepted(auction_id, 3, 125),
        ];

        let book = rebuild_book(Decimal::from(100), Decimal::from(5), &events);
        assert_eq!(book.len(), 3);
        assert_eq!(book.winning_bid().unwrap().amount, Decimal::from(125));
        assert_eq!(book.minimum_next_bid(), Decimal::from(130));
    }

    #[test]
    fn test_replay_is_idempotent() {
        let auction_id = AuctionId::new();
        let events = vec![
            accepted(auction_id, 1, 100),
            accepted(auction_id, 2, 110),
        ];

        let first = rebuild_book(Decimal::from(100), Decimal::from(5), &events);
        let second = rebuild_book(Decimal::from(100), Decimal::from(5), &events);
        assert_eq!(first, second);
    }

    #[test]
    fn test_replay_skips_non_state_events() {
        let auction_id = AuctionId::new();
        let mut events = vec![accepted(auction_id, 1, 100)];
        events.push(AuctionEvent {
            auction_id,
            sequence: 2,
            at: Utc::now(),
            kind: EventKind::AuctionClosed {
                winning_bid: None,
                winning_bidder: None,
                winning_amount: None,
            },
        });

        let book = rebuild_book(Decimal::from(100), Decimal::from(5), &events);
        assert_eq!(book.len(), 1);
    }
}
