//! HTTP middleware implementations
//!
//! This module provides the middleware stages of the request pipeline:
//! - Structured request/response logging
//! - Per-route-group authentication gate
//!
//! Stage order is assembled explicitly in `server::HttpServer::create_app`.

mod auth;
mod helpers;
mod request_log;

// Re-export all middleware
pub use auth::{AuthGate, AuthGateService, Claims, issue_token, verify_token};
pub use helpers::{extract_bearer_token, is_public_route};
pub use request_log::{RequestLog, RequestLogService};
