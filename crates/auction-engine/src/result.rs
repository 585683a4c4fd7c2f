//! Result types for bid submission

use common::BidId;

use crate::event::AuctionEvent;
use crate::validator::RejectReason;

/// Outcome of one bid submission.
///
/// Acceptance carries the broadcast event; rejection carries the reason
/// and an event delivered only to the submitter.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Accepted {
        bid_id: BidId,
        event: AuctionEvent,
    },
    Rejected {
        reason: RejectReason,
        event: AuctionEvent,
    },
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }

    /// The event describing this outcome.
    pub fn event(&self) -> &AuctionEvent {
        match self {
            SubmitOutcome::Accepted { event, .. } => event,
            SubmitOutcome::Rejected { event, .. } => event,
        }
    }

    /// The rejection reason, if rejected.
    pub fn reject_reason(&self) -> Option<&RejectReason> {
        match self {
            SubmitOutcome::Accepted { .. } => None,
            SubmitOutcome::Rejected { reason, .. } => Some(reason),
        }
    }
}
