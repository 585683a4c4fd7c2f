//! Auction matching core for OpenBid
//!
//! This crate implements the real-time bidding core: bid validation,
//! per-auction order books, the matching engine with its per-auction
//! exclusive mutation boundary, the auction lifecycle state machine,
//! and the event model broadcast to subscribers.
//!
//! Different auctions proceed fully in parallel; all accept/reject
//! decisions for one auction are totally ordered.

pub mod book;
pub mod clock;
pub mod domain;
pub mod engine;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod log;
pub mod metrics;
pub mod replay;
pub mod result;
pub mod store;
pub mod validator;

pub use book::OrderBook;
pub use clock::{Clock, ManualClock, SystemClock};
pub use domain::{
    Auction, AuctionSpec, AuctionStatus, Bid, BidStatus, SchedulingDefaults, SettlementRecord,
};
pub use engine::{AuctionEngine, AuctionSnapshot};
pub use error::EngineError;
pub use event::{AuctionEvent, EventKind};
pub use lifecycle::{LifecycleManager, TickReport};
pub use metrics::{EngineMetrics, MetricsSnapshot};
pub use result::SubmitOutcome;
pub use validator::{validate, RejectReason};

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
