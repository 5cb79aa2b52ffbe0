//! Realtime event endpoints
//!
//! Websocket attachment plus an authenticated broadcast endpoint. The
//! route group's realtime bindings are registered through
//! `register_bindings`, which the server runs as an explicit phase after
//! hub construction and before any route configuration.

use crate::server::AppState;
use crate::server::routes::ApiResponse;
use crate::subsystems::{RealtimeEvent, RealtimeHub};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use futures_util::StreamExt;
use std::sync::Arc;
use tracing::{debug, info};

/// Configure realtime routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/ws", web::get().to(ws_connect)).service(
        web::scope("/api/events").route("/broadcast", web::post().to(broadcast_event)),
    );
}

/// Register this route group's realtime bindings
///
/// Must run before the routes themselves are configured: sessions attached
/// through `/ws` expect the chat relay to exist from the first frame.
pub fn register_bindings(hub: &Arc<RealtimeHub>) {
    let weak = Arc::downgrade(hub);
    hub.bind(
        "chat.message",
        "chat-relay",
        Arc::new(move |event| {
            if let Some(hub) = weak.upgrade() {
                let event = event.clone();
                tokio::spawn(async move {
                    let _ = hub.broadcast(&event).await;
                });
            }
        }),
    );

    info!("Realtime bindings registered: chat.message");
}

/// Attach a websocket session to the realtime hub
async fn ws_connect(
    req: HttpRequest,
    body: web::Payload,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let (response, session, mut stream) = actix_ws::handle(&req, body)?;

    let hub = state.realtime().clone();
    let session_id = hub.register(session.clone());

    actix_web::rt::spawn(async move {
        let mut session = session;
        while let Some(Ok(msg)) = stream.next().await {
            match msg {
                actix_ws::Message::Text(text) => hub.dispatch_text(&text),
                actix_ws::Message::Ping(bytes) => {
                    if session.pong(&bytes).await.is_err() {
                        break;
                    }
                }
                actix_ws::Message::Close(reason) => {
                    debug!("Realtime session closing: {:?}", reason);
                    break;
                }
                _ => {}
            }
        }
        hub.unregister(session_id);
    });

    Ok(response)
}

/// Broadcast an event to every attached session
async fn broadcast_event(
    state: web::Data<AppState>,
    event: web::Json<RealtimeEvent>,
) -> ActixResult<HttpResponse> {
    let delivered = state
        .realtime()
        .broadcast(&event)
        .await
        .map_err(actix_web::Error::from)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({
        "event": event.event,
        "delivered": delivered,
    }))))
}
