//! Common types for OpenBid
//!
//! This crate provides the shared identifier newtypes used across
//! all OpenBid crates.

pub mod types;

pub use types::*;
