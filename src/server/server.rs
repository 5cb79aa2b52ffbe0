//! HTTP server core implementation
//!
//! This module provides the HttpServer struct and its core methods. The
//! constructor runs the bootstrap sequence; the listener is only bound
//! once every mandatory subsystem has connected.

use crate::bootstrap::{BootstrapOutcome, BootstrapSequencer};
use crate::config::{Config, ServerConfig};
use crate::health::HealthAggregator;
use crate::server::middleware::{AuthGate, RequestLog};
use crate::server::routes;
use crate::server::state::AppState;
use crate::subsystems::SubsystemSet;
use crate::utils::error::{AppError, Result};
use actix_cors::Cors;
use actix_web::{App, HttpServer as ActixHttpServer, web};
use std::sync::Arc;
use tracing::{info, warn};

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
    /// What the bootstrap pass produced
    outcome: BootstrapOutcome,
}

impl HttpServer {
    /// Create a new HTTP server, running the bootstrap sequence
    ///
    /// Fails when a mandatory subsystem cannot connect; the caller must
    /// exit non-zero in that case without binding a listener.
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");

        let subsystems = Arc::new(SubsystemSet::new(config.subsystems()));

        // Explicit initialization phase: the realtime hub exists now, and
        // route groups register their event bindings against it before any
        // route configuration runs.
        routes::events::register_bindings(subsystems.realtime());

        let sequencer = BootstrapSequencer::new(config.subsystems().connect_timeout());
        let outcome = sequencer.run(&subsystems.handles()).await?;

        let health =
            HealthAggregator::new(subsystems.handles(), config.subsystems().probe_timeout());
        let state = AppState::new(config.clone(), subsystems, health);

        Ok(Self {
            config: config.server().clone(),
            state,
            outcome,
        })
    }

    /// Create the Actix-web application
    fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        info!("Setting up routes and middleware");

        let cors_config = &state.config.server().cors;
        let mut cors = Cors::default();

        if cors_config.enabled {
            if cors_config.allows_all_origins() {
                cors = cors.allow_any_origin();
            } else {
                for origin in &cors_config.allowed_origins {
                    cors = cors.allowed_origin(origin);
                }
            }
            cors = cors.allow_any_method().allow_any_header();
            if cors_config.allow_credentials {
                cors = cors.supports_credentials();
            }
        }

        let max_body_size = state.config.server().max_body_size;

        // Per-request stage order: CORS, request logging, auth gate, route
        // dispatch. Wraps registered innermost-first, so AuthGate goes on
        // before RequestLog. Error normalization is terminal: every
        // AppError renders through ResponseError into the uniform JSON
        // shape, and RequestLog records the status it renders with.
        App::new()
            .app_data(state)
            .app_data(web::JsonConfig::default().limit(max_body_size))
            .wrap(AuthGate)
            .wrap(RequestLog)
            .wrap(cors)
            .configure(routes::health::configure_routes)
            .configure(routes::auth::configure_routes)
            .configure(routes::events::configure_routes)
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        let workers = self.config.worker_count();

        info!("Starting HTTP server on {}", bind_addr);
        if !self.outcome.is_fully_connected() {
            warn!(
                "Serving degraded: {} optional subsystem(s) unavailable",
                self.outcome.failures.len()
            );
        }

        let state = web::Data::new(self.state);

        let server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .workers(workers)
            .bind(&bind_addr)
            .map_err(|e| AppError::server(format!("Failed to bind {}: {}", bind_addr, e)))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| AppError::server(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get the bootstrap outcome
    pub fn outcome(&self) -> &BootstrapOutcome {
        &self.outcome
    }
}
