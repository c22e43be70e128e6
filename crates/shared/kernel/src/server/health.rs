use axum::http::header;
use axum::{Json, response::IntoResponse};
use folio_derive::{api_handler, api_model};
use folio_domain::constants::SYSTEM_TAG;
use std::sync::LazyLock;
use std::time::Instant;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Liveness report.
#[api_model]
pub(super) struct HealthResponse {
    /// Always `up` while the process serves requests.
    status: String,
    /// Server package version.
    version: String,
    /// Seconds since the API state was built.
    uptime: u64,
}

pub(super) static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

#[api_handler(
    get,
    path = "/health",
    responses((status = OK, description = "Service is alive", body = HealthResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler() -> impl IntoResponse {
    let body = HealthResponse {
        status: "up".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        uptime: START_TIME.elapsed().as_secs(),
    };

    (
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(body),
    )
}

/// Routes served outside the `/api` prefix regardless of enabled slices.
pub fn router<S>() -> OpenApiRouter<S>
where
    S: Send + Sync + Clone + 'static,
{
    OpenApiRouter::new().routes(routes!(health_handler))
}
