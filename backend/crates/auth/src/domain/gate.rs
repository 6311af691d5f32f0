//! Gate Decision
//!
//! Pure per-request access decision. Token resolution happens before this
//! point; here a session is either present and valid, or absent.

use url::form_urlencoded;

use crate::domain::entity::session::SessionClaims;
use crate::domain::route::{RouteClass, RouteTable};
use crate::domain::value_object::user_role::UserRole;

/// Outcome of the request gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Hand the request to the downstream handler
    Continue,
    /// No valid session on a protected path
    RedirectToLogin { callback_url: String },
    /// Valid session that must not be here: re-auth page, or admin area without the role
    RedirectToDashboard,
}

impl GateDecision {
    /// Decide for a classified path
    ///
    /// `original_url` is the path plus query string the caller asked for;
    /// it becomes the login callback.
    pub fn evaluate(
        routes: &RouteTable,
        path: &str,
        original_url: &str,
        session: Option<&SessionClaims>,
    ) -> Self {
        match (routes.classify(path), session) {
            (RouteClass::Public, Some(_)) if routes.is_entry_point(path) => {
                GateDecision::RedirectToDashboard
            }
            (RouteClass::Public, _) => GateDecision::Continue,
            (RouteClass::Authenticated | RouteClass::AdminOnly, None) => {
                GateDecision::RedirectToLogin {
                    callback_url: original_url.to_string(),
                }
            }
            (RouteClass::Authenticated, Some(_)) => GateDecision::Continue,
            (RouteClass::AdminOnly, Some(claims)) => match claims.role {
                UserRole::Admin => GateDecision::Continue,
                UserRole::Student => GateDecision::RedirectToDashboard,
            },
        }
    }

    /// `Location` header value for redirects
    pub fn location(&self, routes: &RouteTable) -> Option<String> {
        match self {
            GateDecision::Continue => None,
            GateDecision::RedirectToLogin { callback_url } => {
                let encoded: String = form_urlencoded::byte_serialize(callback_url.as_bytes()).collect();
                Some(format!("{}?callbackUrl={}", routes.login_path(), encoded))
            }
            GateDecision::RedirectToDashboard => Some(routes.dashboard_path().to_string()),
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            GateDecision::Continue => "continue",
            GateDecision::RedirectToLogin { .. } => "redirect_login",
            GateDecision::RedirectToDashboard => "redirect_dashboard",
        }
    }
}
