//! OpenBid CLI and service binary
//!
//! Entry point for the auction matching service. Provides commands for
//! initializing and validating configuration and for running the
//! service: engine, dispatcher, store, lifecycle driver, and settlement
//! wired together, shutting down gracefully on Ctrl+C.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use auction_engine::store::{AuctionStore, MemoryStore};
use auction_engine::{AuctionEngine, Clock, LifecycleManager, SchedulingDefaults, SystemClock};
use cli::{Cli, Commands};
use config::{
    generate_default_config, load_config, save_config, validate_config, OpenBidConfig,
    OverflowPolicySetting,
};
use dispatch::{DispatchConfig, Dispatcher, OverflowPolicy};
use observability::{init_logging, LogFormat};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Start {
            config,
            metrics_port,
        } => start_service(config, metrics_port).await,
        Commands::Validate { config } => {
            init_logging("openbid", LogFormat::Pretty)?;
            validate_command(config)
        }
        Commands::Init { output } => {
            init_logging("openbid", LogFormat::Pretty)?;
            init_command(output)
        }
    }
}

async fn start_service<P: AsRef<Path>>(config_path: P, metrics_port: Option<u16>) -> Result<()> {
    let config = load_config(&config_path)?;

    let format = config
        .logging
        .format
        .parse::<LogFormat>()
        .unwrap_or_default();
    init_logging("openbid", format)?;

    info!("OpenBid starting...");

    let report = validate_config(&config);
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }
    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Cannot start OpenBid due to configuration errors");
    }

    if config.metrics.enabled || metrics_port.is_some() {
        let port = metrics_port.unwrap_or(config.metrics.port);
        observability::init_metrics(port)?;
    }

    let (engine, lifecycle, settler) = build_service(&config)?;

    info!(
        service = %config.service.name,
        version = %config.service.version,
        tick_interval_ms = config.lifecycle.tick_interval_ms,
        "Service ready"
    );

    run_lifecycle_driver(
        engine,
        lifecycle,
        settler,
        Duration::from_millis(config.lifecycle.tick_interval_ms),
    )
    .await;

    info!("Shutdown complete");
    Ok(())
}

type Service = (Arc<AuctionEngine>, LifecycleManager, settlement::Settler);

fn build_service(config: &OpenBidConfig) -> Result<Service> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store: Arc<dyn AuctionStore> = Arc::new(MemoryStore::with_retention(
        config.persistence.recent_bids_retained,
    ));
    let dispatcher = Arc::new(Dispatcher::new(DispatchConfig {
        queue_capacity: config.dispatch.queue_capacity,
        overflow_policy: match config.dispatch.overflow_policy {
            OverflowPolicySetting::DropOldest => OverflowPolicy::DropOldest,
            OverflowPolicySetting::Disconnect => OverflowPolicy::DisconnectSubscriber,
        },
    }));

    let defaults = SchedulingDefaults {
        min_increment: Decimal::try_from(config.auction.min_increment)
            .context("auction.min_increment is not a valid decimal")?,
        reserve_price: Decimal::try_from(config.auction.reserve_price)
            .context("auction.reserve_price is not a valid decimal")?,
    };

    let engine = Arc::new(AuctionEngine::with_defaults(
        dispatcher,
        Arc::clone(&store),
        Arc::clone(&clock),
        defaults,
    ));
    let lifecycle = LifecycleManager::new(Arc::clone(&engine), Arc::clone(&clock));
    let settler = settlement::Settler::new(Arc::clone(&engine), store, clock);

    Ok((engine, lifecycle, settler))
}

/// Tick the lifecycle manager until Ctrl+C, settling auctions as they
/// close.
async fn run_lifecycle_driver(
    engine: Arc<AuctionEngine>,
    lifecycle: LifecycleManager,
    settler: settlement::Settler,
    period: Duration,
) {
    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, initiating graceful shutdown...");
                signal_token.cancel();
            }
            Err(e) => {
                warn!("Failed to listen for Ctrl+C: {}", e);
            }
        }
    });

    let mut ticker = tokio::time::interval(period);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                let report = lifecycle.poll().await;
                for auction_id in report.closed {
                    match settler.settle(auction_id).await {
                        Ok(outcome) => {
                            info!(
                                %auction_id,
                                winner = ?outcome.record.winning_bidder,
                                hammer_price = ?outcome.record.hammer_price,
                                "Auction settled"
                            );
                        }
                        Err(e) => warn!(%auction_id, error = %e, "Settlement failed"),
                    }
                }
                export_engine_metrics(&engine);
            }
        }
    }

    let metrics = engine.metrics();
    info!(
        bids_received = metrics.bids_received,
        bids_accepted = metrics.bids_accepted,
        bids_rejected = metrics.bids_rejected,
        auctions_settled = metrics.auctions_settled,
        "Final engine counters"
    );
}

/// Mirror the engine's internal counters into the Prometheus registry.
fn export_engine_metrics(engine: &AuctionEngine) {
    let snap = engine.metrics();
    metrics::counter!("openbid_bids_received_total").absolute(snap.bids_received);
    metrics::counter!("openbid_bids_accepted_total").absolute(snap.bids_accepted);
    metrics::counter!("openbid_bids_rejected_total").absolute(snap.bids_rejected);
    metrics::counter!("openbid_auctions_settled_total").absolute(snap.auctions_settled);
    metrics::gauge!("openbid_open_auctions").set(snap.open_auctions as f64);
    metrics::gauge!("openbid_submit_latency_max_us").set(snap.submit_latency_max_us as f64);
}

fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    info!(path = ?config_path.as_ref(), "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Service: {}", config.service.name);
    println!("Version: {}", config.service.version);
    println!(
        "Dispatch: {} events/subscriber, {:?} on overflow",
        config.dispatch.queue_capacity, config.dispatch.overflow_policy
    );
    println!("Lifecycle tick: {}ms", config.lifecycle.tick_interval_ms);

    Ok(())
}

fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Edit the configuration file to customize settings");
    println!(
        "  2. Run 'openbid validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  3. Run 'openbid start --config {:?}' to start the service",
        output_path
    );

    Ok(())
}
