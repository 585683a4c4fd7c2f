use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Top-level configuration for an OpenBid deployment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenBidConfig {
    pub service: ServiceConfig,
    #[serde(default)]
    pub auction: AuctionDefaultsConfig,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    #[serde(default)]
    pub dispatch: DispatchSettings,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
}

/// Defaults applied to auctions scheduled without explicit values.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuctionDefaultsConfig {
    /// Minimum amount a new bid must exceed the current winner by
    #[serde(rename = "min_increment")]
    #[serde(default = "default_min_increment")]
    pub min_increment: f64,
    /// Lowest admissible first bid when an auction sets no reserve
    #[serde(rename = "reserve_price")]
    #[serde(default)]
    pub reserve_price: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LifecycleConfig {
    /// How often the lifecycle driver checks for due open/close transitions
    #[serde(rename = "tick_interval_ms")]
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DispatchSettings {
    /// Maximum queued events per subscriber
    #[serde(rename = "queue_capacity")]
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// What to do with a subscriber whose queue is full
    #[serde(rename = "overflow_policy")]
    #[serde(default)]
    pub overflow_policy: OverflowPolicySetting,
}

/// Overflow policy names as they appear in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicySetting {
    #[default]
    DropOldest,
    Disconnect,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PersistenceConfig {
    /// Bids retained per auction by the in-memory store
    #[serde(rename = "recent_bids_retained")]
    #[serde(default = "default_recent_bids_retained")]
    pub recent_bids_retained: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log output format: pretty, json, or compact
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for AuctionDefaultsConfig {
    fn default() -> Self {
        Self {
            min_increment: default_min_increment(),
            reserve_price: 0.0,
        }
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            overflow_policy: OverflowPolicySetting::default(),
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            recent_bids_retained: default_recent_bids_retained(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}
