//! Route Classification
//!
//! Static mapping from request paths to access classes. Classification is
//! total: a path that matches no configured prefix is [`RouteClass::Authenticated`].
//!
//! ## Prefix matching
//! A prefix `p` matches a path `x` when `x == p` or `x` starts with `p/`.
//! `/blog` therefore covers `/blog` and `/blog/post-1` but not `/blogger`.
//! The root prefix `/` matches only `/` itself.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Paths the gate never sees: API handlers check sessions themselves,
/// framework internals and static files carry no protected content.
const EXCLUDED_PATHS: &str = r"^/(?:(?:api|_next|fonts|examples)(?:/|$)|[\w-]+\.\w+$)";

static EXCLUDED_MATCHER: OnceLock<Option<Regex>> = OnceLock::new();

/// Access class of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Reachable without a session
    Public,
    /// Requires any valid session
    Authenticated,
    /// Requires a session with the admin role
    AdminOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteConfigError {
    #[error("Route prefix must start with '/': {0:?}")]
    NotAbsolute(String),

    #[error("Route prefix must not end with '/': {0:?}")]
    TrailingSlash(String),

    #[error("Entry point {0:?} is not a public route")]
    EntryPointNotPublic(String),
}

/// Route table consulted by the request gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    public: Vec<String>,
    /// Login/registration pages; authenticated users are sent away from these
    entry_points: Vec<String>,
    admin: Vec<String>,
    login_path: String,
    dashboard_path: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            public: to_owned(&["/", "/login", "/registro", "/esqueci-senha", "/blog"]),
            entry_points: to_owned(&["/login", "/registro"]),
            admin: to_owned(&["/admin"]),
            login_path: "/login".to_string(),
            dashboard_path: "/dashboard".to_string(),
        }
    }
}

impl RouteTable {
    /// Build a validated table
    ///
    /// Every prefix must be absolute and, except the root, have no trailing
    /// slash. Entry points must themselves be public.
    pub fn new(
        public: Vec<String>,
        entry_points: Vec<String>,
        admin: Vec<String>,
        login_path: String,
        dashboard_path: String,
    ) -> Result<Self, RouteConfigError> {
        for prefix in public
            .iter()
            .chain(&entry_points)
            .chain(&admin)
            .chain([&login_path, &dashboard_path])
        {
            validate_prefix(prefix)?;
        }

        let table = Self {
            public,
            entry_points,
            admin,
            login_path,
            dashboard_path,
        };

        if let Some(entry) = table
            .entry_points
            .iter()
            .find(|entry| table.classify(entry) != RouteClass::Public)
        {
            return Err(RouteConfigError::EntryPointNotPublic(entry.clone()));
        }

        Ok(table)
    }

    /// Classify a request path
    ///
    /// Admin prefixes win over public ones, so listing an admin area as
    /// public by mistake still denies access.
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.admin.iter().any(|prefix| prefix_matches(prefix, path)) {
            RouteClass::AdminOnly
        } else if self.public.iter().any(|prefix| prefix_matches(prefix, path)) {
            RouteClass::Public
        } else {
            RouteClass::Authenticated
        }
    }

    /// Exact match against login/registration pages
    pub fn is_entry_point(&self, path: &str) -> bool {
        self.entry_points.iter().any(|entry| entry == path)
    }

    pub fn public(&self) -> &[String] {
        &self.public
    }

    pub fn entry_points(&self) -> &[String] {
        &self.entry_points
    }

    pub fn admin(&self) -> &[String] {
        &self.admin
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn dashboard_path(&self) -> &str {
        &self.dashboard_path
    }

    /// Whether the gate runs for this path at all
    ///
    /// If the exclusion pattern ever failed to compile every path is gated.
    pub fn is_gated(path: &str) -> bool {
        let matcher = EXCLUDED_MATCHER.get_or_init(|| Regex::new(EXCLUDED_PATHS).ok());
        match matcher {
            Some(re) => !re.is_match(path),
            None => true,
        }
    }
}

fn to_owned(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| (*p).to_string()).collect()
}

fn validate_prefix(prefix: &str) -> Result<(), RouteConfigError> {
    if !prefix.starts_with('/') {
        return Err(RouteConfigError::NotAbsolute(prefix.to_string()));
    }
    if prefix.len() > 1 && prefix.ends_with('/') {
        return Err(RouteConfigError::TrailingSlash(prefix.to_string()));
    }
    Ok(())
}

fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return path == "/";
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_public_routes() {
        let table = RouteTable::default();
        for path in ["/", "/login", "/registro", "/esqueci-senha", "/blog", "/blog/a-post"] {
            assert_eq!(table.classify(path), RouteClass::Public, "{path}");
        }
    }

    #[test]
    fn test_root_prefix_is_exact() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/dashboard"), RouteClass::Authenticated);
        assert_eq!(table.classify("/cursos/rust"), RouteClass::Authenticated);
    }

    #[test]
    fn test_prefix_respects_segment_boundary() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/blogger"), RouteClass::Authenticated);
        assert_eq!(table.classify("/login-as-admin"), RouteClass::Authenticated);
        assert_eq!(table.classify("/administrator"), RouteClass::Authenticated);
    }

    #[test]
    fn test_admin_routes() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/admin"), RouteClass::AdminOnly);
        assert_eq!(table.classify("/admin/contacts"), RouteClass::AdminOnly);
    }

    #[test]
    fn test_unlisted_paths_are_protected() {
        let table = RouteTable::default();
        for path in ["/dashboard", "/perfil", "/checkout/success", "/unknown/deep/path"] {
            assert_eq!(table.classify(path), RouteClass::Authenticated, "{path}");
        }
    }

    #[test]
    fn test_admin_wins_over_public_misconfiguration() {
        let table = RouteTable::new(
            to_owned(&["/", "/login", "/admin"]),
            to_owned(&["/login"]),
            to_owned(&["/admin"]),
            "/login".to_string(),
            "/dashboard".to_string(),
        )
        .unwrap();
        assert_eq!(table.classify("/admin/users"), RouteClass::AdminOnly);
    }

    #[test]
    fn test_entry_points_are_exact() {
        let table = RouteTable::default();
        assert!(table.is_entry_point("/login"));
        assert!(table.is_entry_point("/registro"));
        assert!(!table.is_entry_point("/login/help"));
        assert!(!table.is_entry_point("/blog"));
    }

    #[test]
    fn test_new_rejects_bad_prefixes() {
        let build = |public: &[&str], entry: &[&str]| {
            RouteTable::new(
                to_owned(public),
                to_owned(entry),
                to_owned(&["/admin"]),
                "/login".to_string(),
                "/dashboard".to_string(),
            )
        };

        assert_eq!(
            build(&["blog", "/login"], &["/login"]),
            Err(RouteConfigError::NotAbsolute("blog".to_string()))
        );
        assert_eq!(
            build(&["/blog/", "/login"], &["/login"]),
            Err(RouteConfigError::TrailingSlash("/blog/".to_string()))
        );
        assert_eq!(
            build(&["/blog"], &["/login"]),
            Err(RouteConfigError::EntryPointNotPublic("/login".to_string()))
        );
    }

    #[test]
    fn test_excluded_paths() {
        for path in [
            "/api/auth/login",
            "/api",
            "/_next/static/chunk.js",
            "/fonts/inter.woff2",
            "/examples/demo",
            "/favicon.ico",
            "/robots.txt",
            "/push-service-worker.js",
        ] {
            assert!(!RouteTable::is_gated(path), "{path}");
        }
    }

    #[test]
    fn test_gated_paths() {
        for path in ["/", "/login", "/admin/contacts", "/apiary", "/blog/post.html", "/dashboard"] {
            assert!(RouteTable::is_gated(path), "{path}");
        }
    }
}
