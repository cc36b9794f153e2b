use std::future::Future;

use axum::extract::State;
use axum::http::StatusCode;

/// Dependency check consulted by `GET /readyz`.
pub trait ReadinessProbe: Clone + Send + Sync + 'static {
    fn is_ready(&self) -> impl Future<Output = bool> + Send;
}

/// Handler for `GET /healthz` — liveness check, never touches dependencies.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz` — 503 until the probe reports ready.
pub async fn readyz<S: ReadinessProbe>(State(probe): State<S>) -> StatusCode {
    if probe.is_ready().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
