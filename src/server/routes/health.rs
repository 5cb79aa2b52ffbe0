//! Health check endpoint
//!
//! Re-probes every subsystem on demand and reports the composite status.
//! This endpoint is typically used by load balancers and monitoring
//! systems, and also backs the client's loading screen.

use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde_json::json;
use tracing::{debug, error};

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

/// Composite health check endpoint
///
/// Always answers 200 when aggregation completes, even with
/// `"status": "error"` in the body: a degraded-but-responding gateway is
/// still a successful health check. Only a failure of the aggregation
/// itself yields a 500.
pub async fn health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    match state.health.check().await {
        Ok(report) => Ok(HttpResponse::Ok().json(report)),
        Err(e) => {
            error!("Health aggregation failed: {}", e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "Health check failed",
                "timestamp": chrono::Utc::now(),
            })))
        }
    }
}
