//! Authentication middleware
//!
//! Per-route-group gate: public route groups (health, auth, websocket
//! upgrade) pass through; everything else requires a valid bearer token.

use crate::config::AuthConfig;
use crate::server::AppState;
use crate::server::middleware::helpers::{extract_bearer_token, is_public_route};
use crate::utils::error::AppError;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{HttpMessage, web};
use futures::future::{Ready, ready};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

/// JWT claims carried by session tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

/// Issue a signed token for the given subject
pub fn issue_token(config: &AuthConfig, subject: &str) -> crate::utils::error::Result<String> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: subject.to_string(),
        iat: now.timestamp(),
        exp: (now + chrono::Duration::seconds(config.token_ttl as i64)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(AppError::Jwt)
}

/// Verify a token and return its claims
pub fn verify_token(config: &AuthConfig, token: &str) -> crate::utils::error::Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(AppError::Jwt)?;

    Ok(data.claims)
}

/// Auth gate middleware for Actix-web
pub struct AuthGate;

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AuthGateService<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateService { service }))
    }
}

/// Service implementation for the auth gate
pub struct AuthGateService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = std::result::Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let path = req.path().to_string();

        if is_public_route(&path) {
            return Box::pin(self.service.call(req));
        }

        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = extract_bearer_token(req.headers());

        let verified = match (state, token) {
            (Some(state), Some(token)) => {
                match verify_token(state.config.auth(), &token) {
                    Ok(claims) => {
                        debug!("Authenticated request for {}", claims.sub);
                        req.extensions_mut().insert(claims);
                        Ok(())
                    }
                    Err(e) => {
                        warn!("Token validation failed on {}: {}", path, e);
                        Err(AppError::unauthorized("Invalid or expired token"))
                    }
                }
            }
            (_, None) => Err(AppError::unauthorized("Missing bearer token")),
            (None, _) => Err(AppError::Internal("Application state missing".to_string())),
        };

        match verified {
            Ok(()) => Box::pin(self.service.call(req)),
            Err(e) => Box::pin(async move { Err(e.into()) }),
        }
    }
}
