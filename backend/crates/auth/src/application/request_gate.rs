//! Request Gate Use Case
//!
//! Resolves the session token and applies the route table. Synchronous:
//! token validation is one HMAC over a short string.

use crate::application::session_token::SessionCodec;
use crate::domain::entity::session::SessionClaims;
use crate::domain::gate::GateDecision;
use crate::domain::route::RouteTable;

#[derive(Debug, Clone)]
pub struct RequestGate {
    routes: RouteTable,
    codec: SessionCodec,
}

impl RequestGate {
    pub fn new(routes: RouteTable, codec: SessionCodec) -> Self {
        Self { routes, codec }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Decide for one request
    ///
    /// The resolved claims come back alongside the decision so a `Continue`
    /// can hand them to downstream handlers.
    pub fn evaluate(
        &self,
        path: &str,
        original_url: &str,
        token: Option<&str>,
    ) -> (GateDecision, Option<SessionClaims>) {
        let session = self.codec.resolve(token);
        let decision = GateDecision::evaluate(&self.routes, path, original_url, session.as_ref());
        (decision, session)
    }
}
