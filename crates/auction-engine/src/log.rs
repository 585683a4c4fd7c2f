//! Per-auction event log
//!
//! Records broadcast events in sequence order. The log backs recovery:
//! replaying it from empty rebuilds the order book (see `replay`).

use tracing::debug;

use crate::event::AuctionEvent;

/// In-memory event log for one auction.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<AuctionEvent>,
    sequence: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a broadcast event. Events must arrive in sequence order.
    pub fn append(&mut self, event: AuctionEvent) {
        debug_assert!(event.sequence > self.sequence, "out-of-order event append");
        self.sequence = event.sequence;
        self.events.push(event);
        debug!(sequence = self.sequence, "Event appended to log");
    }

    /// Events with sequence >= `from_sequence`.
    pub fn get_from(&self, from_sequence: u64) -> Vec<AuctionEvent> {
        self.events
            .iter()
            .filter(|e| e.sequence >= from_sequence)
            .cloned()
            .collect()
    }

    /// Sequence of the most recently appended event (0 when empty).
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[AuctionEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use chrono::Utc;
    use common::AuctionId;

    fn closed_event(auction_id: AuctionId, sequence: u64) -> AuctionEvent {
        AuctionEvent {
            auction_id,
            sequence,
            at: Utc::now(),
            kind: EventKind::AuctionClosed {
                winning_bid: None,
                winning_bidder: None,
                winning_amount: None,
            },
        }
    }

    #[test]
    fn test_append_tracks_sequence() {
        let auction_id = AuctionId::new();
        let mut log = EventLog::new();
        assert_eq!(log.sequence(), 0);

        log.append(closed_event(auction_id, 1));
        log.append(closed_event(auction_id, 2));

        assert_eq!(log.sequence(), 2);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_get_from_is_inclusive() {
        let auction_id = AuctionId::new();
        let mut log = EventLog::new();
        for seq in 1..=4 {
            log.append(closed_event(auction_id, seq));
        }

        let tail = log.get_from(3);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].sequence, 3);
        assert_eq!(tail[1].sequence, 4);
    }
}
