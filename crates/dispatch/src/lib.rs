//! Event fan-out for OpenBid
//!
//! The dispatcher maintains one topic per auction and one bounded queue
//! per subscriber. Publishing never blocks: a full queue is resolved by
//! the configured overflow policy (drop the oldest queued event or
//! disconnect the subscriber) so a slow consumer cannot delay dispatch
//! to anyone else, and never affects matching.

pub mod dispatcher;
pub mod queue;

pub use dispatcher::{DispatchConfig, Dispatcher, EventStream, PublishStats};
pub use queue::OverflowPolicy;
