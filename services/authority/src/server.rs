use crate::cli::ServeArgs;
use crate::config::AuthorityServiceConfig;
use crate::error::ServiceError;
use crate::registry::Registry;
use crate::routes::router;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use metrics_exporter_prometheus::PrometheusHandle;
use missive_ack::telemetry;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct MetricsState {
    handle: Arc<PrometheusHandle>,
}

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), ServiceError> {
    let mut config = AuthorityServiceConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(registry) = args.registry.take() {
        config.registry = registry;
    }

    telemetry::init(&config.telemetry)?;

    let registry = Arc::new(Registry::from_path(&config.registry)?);
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let metrics = MetricsState {
        handle: Arc::new(prometheus_handle),
    };

    let app = router(registry)
        .route("/metrics", get(metrics_endpoint))
        .layer(Extension(metrics))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, registry = %config.registry.display(), "validation authority ready");

    axum::serve(listener, app).await?;
    Ok(())
}

pub(crate) async fn metrics_endpoint(
    Extension(state): Extension<MetricsState>,
) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.handle.render(),
    )
}
