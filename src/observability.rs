use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: successful price quotes served.
pub const QUOTES_TOTAL: &str = "frontdesk_quotes_total";

/// Counter: bookings committed.
pub const COMMITS_TOTAL: &str = "frontdesk_commits_total";

/// Counter: bookings cancelled (refunds issued).
pub const CANCELLATIONS_TOTAL: &str = "frontdesk_cancellations_total";

/// Counter: commits rejected because the dates were already taken.
pub const CONFLICTS_TOTAL: &str = "frontdesk_conflicts_total";

// ── USE metrics (resource utilization) ──────────────────────────

/// Gauge: rooms currently registered.
pub const ROOMS_ACTIVE: &str = "frontdesk_rooms_active";

/// Histogram: WAL group-commit flush duration in seconds.
pub const WAL_FLUSH_DURATION_SECONDS: &str = "frontdesk_wal_flush_duration_seconds";

/// Histogram: WAL group-commit batch size (events per flush).
pub const WAL_FLUSH_BATCH_SIZE: &str = "frontdesk_wal_flush_batch_size";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Install a plain fmt tracing subscriber. For embedding binaries and
/// ad-hoc debugging; calling it twice panics, so tests leave it alone.
pub fn init_tracing() {
    tracing_subscriber::fmt::init();
}
