//! Unauthenticated liveness probe.

use actix_web::{HttpResponse, get};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Probe response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    /// Fixed marker; always `"OK"` while the process serves traffic.
    #[schema(example = "OK")]
    pub status: String,
}

/// Liveness probe. Bypasses both the API-key gate and authentication so
/// load balancers can poll it without credentials.
#[utoipa::path(
    get,
    path = "/status",
    tags = ["status"],
    security([]),
    responses((status = 200, description = "Server is alive", body = StatusResponse))
)]
#[get("/status")]
pub async fn status() -> HttpResponse {
    HttpResponse::Ok().json(StatusResponse {
        status: "OK".to_owned(),
    })
}
