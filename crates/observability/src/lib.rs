//! Observability infrastructure for OpenBid
//!
//! This crate provides:
//! - Structured logging via tracing
//! - A Prometheus metrics exporter
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("openbid", LogFormat::Pretty)?;
//! observability::metrics::init_metrics(9090)?;
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::init_metrics;
