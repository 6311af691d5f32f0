//! Application Configuration
//!
//! Configuration for the Auth application layer, read from the process
//! environment at startup.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::crypto;
use platform::password::WorkFactor;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::domain::route::{RouteConfigError, RouteTable};

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Minimum signing secret length in bytes
pub const MIN_SECRET_LENGTH: usize = 32;

/// Default session lifetime (30 days)
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 24 * 3600);

const DEFAULT_COOKIE_NAME: &str = "session-token";
const DEFAULT_ADMIN_NAME: &str = "Administrator";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("AUTH_SECRET must be set")]
    MissingSecret,

    #[error("AUTH_SECRET must be at least 32 bytes, got {0}")]
    SecretTooShort(usize),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid route configuration: {0}")]
    Routes(#[from] RouteConfigError),
}

// ============================================================================
// Session Secret
// ============================================================================

/// HMAC key for session tokens, zeroized on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SessionSecret(Vec<u8>);

impl SessionSecret {
    pub fn new(bytes: Vec<u8>) -> Result<Self, ConfigError> {
        if bytes.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::SecretTooShort(bytes.len()));
        }
        Ok(Self(bytes))
    }

    /// Standard base64 if it decodes to a long enough key, raw bytes otherwise
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        match crypto::from_base64(raw) {
            Ok(decoded) if decoded.len() >= MIN_SECRET_LENGTH => Ok(Self(decoded)),
            _ => Self::new(raw.as_bytes().to_vec()),
        }
    }

    /// Random key; sessions do not survive a restart
    pub fn generate() -> Self {
        Self(crypto::random_bytes(MIN_SECRET_LENGTH))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionSecret").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Admin Seed
// ============================================================================

/// Initial admin account created at startup when none exists
#[derive(Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: Zeroizing<String>,
}

impl fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSeed")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Auth Config
// ============================================================================

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// HMAC key for session tokens
    pub session_secret: SessionSecret,
    pub session_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Argon2id cost for new digests
    pub work_factor: WorkFactor,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    pub routes: RouteTable,
    pub admin_seed: Option<AdminSeed>,
}

impl AuthConfig {
    /// Defaults around an explicit signing secret
    pub fn new(session_secret: SessionSecret) -> Self {
        Self {
            session_cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            session_secret,
            session_ttl: DEFAULT_SESSION_TTL,
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            work_factor: WorkFactor::default(),
            password_pepper: None,
            routes: RouteTable::default(),
            admin_seed: None,
        }
    }

    /// Create config for development (random secret, insecure cookie, cheap hashing)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            work_factor: WorkFactor::development(),
            ..Self::new(SessionSecret::generate())
        }
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secret = var("AUTH_SECRET").ok_or(ConfigError::MissingSecret)?;
        let mut config = Self::new(SessionSecret::parse(&secret)?);

        if let Some(name) = var("SESSION_COOKIE_NAME") {
            config.session_cookie_name = name.trim().to_string();
        }

        if let Some(secs) = parse_var::<u64>(&var, "SESSION_TTL_SECS")? {
            if secs == 0 {
                return Err(invalid("SESSION_TTL_SECS", secs.to_string()));
            }
            config.session_ttl = Duration::from_secs(secs);
        }

        if let Some(raw) = var("COOKIE_SECURE") {
            config.cookie_secure = parse_bool(&raw).ok_or_else(|| invalid("COOKIE_SECURE", raw))?;
        }

        config.password_pepper = var("PASSWORD_PEPPER").map(String::into_bytes);

        let defaults = WorkFactor::default();
        config.work_factor = WorkFactor {
            memory_kib: parse_var(&var, "ARGON2_MEMORY_KIB")?.unwrap_or(defaults.memory_kib),
            iterations: parse_var(&var, "ARGON2_ITERATIONS")?.unwrap_or(defaults.iterations),
            parallelism: parse_var(&var, "ARGON2_PARALLELISM")?.unwrap_or(defaults.parallelism),
        };

        config.routes = routes_from_lookup(&var)?;

        config.admin_seed = match (var("ADMIN_EMAIL"), var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed {
                name: var("ADMIN_NAME").unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string()),
                email,
                password: Zeroizing::new(password),
            }),
            _ => None,
        };

        Ok(config)
    }

    /// Session TTL in whole seconds
    pub fn session_ttl_secs(&self) -> i64 {
        i64::try_from(self.session_ttl.as_secs()).unwrap_or(i64::MAX)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Attributes of the session cookie
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl_secs()),
        }
    }
}

/// Route lists override the defaults one at a time
fn routes_from_lookup<F>(var: &F) -> Result<RouteTable, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let public = var("PUBLIC_ROUTES").map(|raw| split_list(&raw));
    let entry_points = var("AUTH_ENTRY_ROUTES").map(|raw| split_list(&raw));
    let admin = var("ADMIN_ROUTES").map(|raw| split_list(&raw));

    if public.is_none() && entry_points.is_none() && admin.is_none() {
        return Ok(RouteTable::default());
    }

    let defaults = RouteTable::default();
    Ok(RouteTable::new(
        public.unwrap_or_else(|| defaults.public().to_vec()),
        entry_points.unwrap_or_else(|| defaults.entry_points().to_vec()),
        admin.unwrap_or_else(|| defaults.admin().to_vec()),
        defaults.login_path().to_string(),
        defaults.dashboard_path().to_string(),
    )?)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_var<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match var(key) {
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| invalid(key, raw)),
        None => Ok(None),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(key: &'static str, value: String) -> ConfigError {
    ConfigError::InvalidValue { key, value }
}
