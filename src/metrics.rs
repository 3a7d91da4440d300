use crate::error::{MapError, Result};
use std::net::{SocketAddr, ToSocketAddrs};
use tracing::{info, warn};

pub const FILTER_APPLIED: &str = "dining_map_filter_applied_total";
pub const FILTER_EMPTY_RESULT: &str = "dining_map_filter_empty_result_total";
pub const LAYER_TOGGLED: &str = "dining_map_layer_toggled_total";
pub const VISIBLE_RECORDS: &str = "dining_map_visible_records";

/// Metrics for map interactions
pub struct MapMetrics;

impl MapMetrics {
    pub fn record_filter_applied(visible: usize) {
        ::metrics::counter!(FILTER_APPLIED).increment(1);
        if visible == 0 {
            ::metrics::counter!(FILTER_EMPTY_RESULT).increment(1);
        }
        ::metrics::gauge!(VISIBLE_RECORDS).set(visible as f64);
    }

    pub fn record_layer_toggled(visible: usize) {
        ::metrics::counter!(LAYER_TOGGLED).increment(1);
        ::metrics::gauge!(VISIBLE_RECORDS).set(visible as f64);
    }

    /// Pre-register so the series appear on /metrics before first use
    pub fn register_metrics() {
        let _ = ::metrics::counter!(FILTER_APPLIED);
        let _ = ::metrics::counter!(FILTER_EMPTY_RESULT);
        let _ = ::metrics::counter!(LAYER_TOGGLED);
        let _ = ::metrics::gauge!(VISIBLE_RECORDS);
    }
}

/// Exporter address on the configured server host
pub fn exporter_addr(host: &str, port: u16) -> Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| MapError::Config(format!("metrics host resolves to no address: {}", host)))
}

/// Install the Prometheus exporter on `host:port`. Failure is logged, not fatal.
pub fn init_metrics(host: &str, port: u16) {
    let addr = match exporter_addr(host, port) {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Prometheus exporter not started: {}", e);
            return;
        }
    };
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => {
            MapMetrics::register_metrics();
            info!("Prometheus exporter listening on http://{}/metrics", addr);
        }
        Err(e) => {
            warn!("Prometheus exporter install failed (possibly already installed): {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exporter_binds_configured_host() {
        let addr = exporter_addr("127.0.0.1", 9898).unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 9898);
        assert!(exporter_addr("localhost", 9898).unwrap().ip().is_loopback());
    }
}
