//! Request Gate Middleware
//!
//! Runs in front of every page route. Excluded paths (API, framework
//! assets, static files) pass straight through.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;

use crate::application::request_gate::RequestGate;
use crate::domain::route::RouteTable;

/// Middleware state
#[derive(Clone)]
pub struct GateState {
    pub gate: Arc<RequestGate>,
    pub cookie_name: Arc<str>,
}

impl GateState {
    pub fn new(gate: RequestGate, cookie_name: impl Into<Arc<str>>) -> Self {
        Self {
            gate: Arc::new(gate),
            cookie_name: cookie_name.into(),
        }
    }
}

/// Allow or redirect based on the session token and the route table
///
/// On `Continue` the resolved [`crate::domain::entity::session::SessionClaims`]
/// are stored in request extensions.
pub async fn request_gate(
    State(state): State<GateState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    if !RouteTable::is_gated(&path) {
        return next.run(req).await;
    }

    let original_url = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());

    let token = platform::cookie::extract_session_credential(req.headers(), &state.cookie_name);

    let (decision, session) = state.gate.evaluate(&path, &original_url, token.as_deref());

    tracing::debug!(path = %path, decision = decision.kind(), "Request gate");

    match decision.location(state.gate.routes()) {
        None => {
            if let Some(claims) = session {
                req.extensions_mut().insert(claims);
            }
            next.run(req).await
        }
        Some(location) => Redirect::temporary(&location).into_response(),
    }
}
