use axum::routing::{get, post};
use axum::Router;

use bagtrack_application::AppState;

use crate::handlers::{ops_handlers, query_handlers, scan_handlers, stats_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/baggage/scan", post(scan_handlers::log_scan))
        .route(
            "/baggage/scans/bag/:bag_tag_id",
            get(query_handlers::list_bag_scans),
        )
        .route(
            "/baggage/scans/gate/:destination_gate",
            get(query_handlers::list_gate_scans),
        )
        .route(
            "/baggage/active/gate/:destination_gate",
            get(stats_handlers::active_bags),
        )
        .route(
            "/baggage/stats/gate-counts/since_minutes",
            get(stats_handlers::gate_counts),
        )
        .route("/ops/health/live", get(ops_handlers::health_live))
        .route("/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
