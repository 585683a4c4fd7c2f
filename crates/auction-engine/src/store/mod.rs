//! Persistence collaborators for the auction core
//!
//! The engine calls the store at well-defined points (accept, close,
//! settle). In-memory state is authoritative for matching; the store is
//! eventually-consistent record-keeping and its failures never roll
//! back a decision.

pub mod memory;
pub mod traits;

pub use memory::MemoryStore;
pub use traits::{AuctionStore, StoreError, StoreResult};
