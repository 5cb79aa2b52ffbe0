//! Authentication endpoints
//!
//! Token issuance for the configured operator credentials. The full user
//! store lives behind the database subsystem and is out of scope here;
//! this group only covers the session-token seam the protected route
//! groups depend on.

use crate::server::AppState;
use crate::server::middleware::issue_token;
use crate::server::routes::ApiResponse;
use crate::utils::error::AppError;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Configure authentication routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").route("/login", web::post().to(login)));
}

/// User login request
#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

/// Login response
#[derive(Debug, Serialize)]
struct LoginResponse {
    access_token: String,
    token_type: String,
    expires_in: u64,
}

/// Issue a session token for valid credentials
async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    let auth = state.config.auth();

    let valid = !auth.admin_password.is_empty()
        && request.username == auth.admin_username
        && request.password == auth.admin_password;

    if !valid {
        warn!("Rejected login attempt for {}", request.username);
        return Err(AppError::auth("Invalid credentials").into());
    }

    let token = issue_token(auth, &request.username).map_err(actix_web::Error::from)?;
    info!("Issued session token for {}", request.username);

    Ok(HttpResponse::Ok().json(ApiResponse::success(LoginResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: auth.token_ttl,
    })))
}
