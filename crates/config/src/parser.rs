use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Load a configuration file, applying environment variable substitution.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<OpenBidConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let substituted = substitution::substitute_env_vars(&content);
    debug!("Environment variable substitution completed");

    let config: OpenBidConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    info!("Configuration loaded successfully");
    Ok(config)
}

/// Generate a configuration populated with the shipped defaults.
pub fn generate_default_config() -> OpenBidConfig {
    OpenBidConfig {
        service: ServiceConfig {
            name: "OpenBid".to_string(),
            description: "A real-time auction matching service".to_string(),
            version: "1.0.0".to_string(),
        },
        auction: AuctionDefaultsConfig::default(),
        lifecycle: LifecycleConfig::default(),
        dispatch: DispatchSettings::default(),
        persistence: PersistenceConfig::default(),
        logging: LoggingConfig::default(),
        metrics: MetricsConfig::default(),
    }
}

/// Write a configuration to disk as YAML.
pub fn save_config<P: AsRef<Path>>(config: &OpenBidConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    let yaml = serde_yaml::to_string(config).with_context(|| "Failed to serialize config")?;
    fs::write(path, yaml).with_context(|| format!("Failed to write config file: {:?}", path))?;
    info!("Configuration saved to: {:?}", path);
    Ok(())
}
