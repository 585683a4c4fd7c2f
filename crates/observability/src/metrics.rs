//! Prometheus metrics exporter
//!
//! The auction engine keeps its own atomic counters; this module only
//! exposes them (and anything else recorded through the `metrics`
//! facade) over HTTP for scraping.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Start the Prometheus exporter on the given port.
///
/// Metrics become available at `http://0.0.0.0:<port>/metrics`.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new().with_http_listener(addr).install()?;

    tracing::info!(%addr, "Metrics exporter listening");
    Ok(())
}
