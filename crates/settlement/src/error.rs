//! Settlement error types

use thiserror::Error;

/// Errors that can occur during settlement
#[derive(Error, Debug)]
pub enum SettlementError {
    /// The engine refused the transition (unknown auction, not closed)
    #[error(transparent)]
    Engine(#[from] auction_engine::EngineError),
}
