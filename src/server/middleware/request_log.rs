//! Request logging middleware
//!
//! Wraps the downstream call so the logged status code and elapsed time
//! reflect the response as it is flushed, including error responses
//! produced by the terminal error normalization.

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;
use tracing::info;

/// Request logging middleware for Actix-web
pub struct RequestLog;

impl<S, B> Transform<S, ServiceRequest> for RequestLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequestLogService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLogService { service }))
    }
}

/// Service implementation for request logging
pub struct RequestLogService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLogService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let query = req.query_string().to_string();

        let request_size: usize = req
            .headers()
            .get("content-length")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        let fut = self.service.call(req);

        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    log_request(
                        &method,
                        &path,
                        &query,
                        request_size,
                        res.status().as_u16(),
                        start_time,
                    );
                    Ok(res)
                }
                Err(e) => {
                    // Errors still produce a response downstream; log the
                    // status they will render with.
                    let status = e.as_response_error().status_code().as_u16();
                    log_request(&method, &path, &query, request_size, status, start_time);
                    Err(e)
                }
            }
        })
    }
}

fn log_request(
    method: &str,
    path: &str,
    query: &str,
    request_size: usize,
    status: u16,
    start_time: Instant,
) {
    let elapsed = start_time.elapsed();
    if query.is_empty() {
        info!(
            "{} {} -> {} in {:?} ({} bytes in)",
            method, path, status, elapsed, request_size
        );
    } else {
        info!(
            "{} {}?{} -> {} in {:?} ({} bytes in)",
            method, path, query, status, elapsed, request_size
        );
    }
}
