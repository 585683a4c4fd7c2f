//! Engine error types
//!
//! A rejected bid is NOT an error; it is a normal `SubmitOutcome`. The
//! close/accept race likewise resolves to a rejection, never an error.
//! Persistence failures are reported on the log and do not surface here.

use common::AuctionId;
use thiserror::Error;

use crate::domain::AuctionStatus;

/// Errors that can occur in engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// No auction registered under this id
    #[error("unknown auction: {0}")]
    UnknownAuction(AuctionId),

    /// A lifecycle transition that the state machine does not allow
    #[error("invalid transition for auction {auction_id}: {from} -> {to}")]
    InvalidTransition {
        auction_id: AuctionId,
        from: AuctionStatus,
        to: AuctionStatus,
    },

    /// A malformed auction spec
    #[error("invalid auction spec: {0}")]
    InvalidSpec(String),
}
