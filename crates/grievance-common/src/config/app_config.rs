//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present).

use grievance_core::{PageLimits, SameStatusPolicy, TransitionPolicy};
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub idp: IdpConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub snowflake: SnowflakeConfig,
    pub lifecycle: LifecycleConfig,
    pub paging: PagingConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            _ => Err(()),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Persistence configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL URL, or `memory://` for the in-process store
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
    /// Directory holding the SQL migrations applied at startup
    pub migrations_dir: String,
    /// JSON ward seed for the in-process store
    pub wards_file: Option<String>,
}

impl DatabaseConfig {
    pub const MEMORY_URL: &'static str = "memory://";

    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.url.starts_with(Self::MEMORY_URL)
    }
}

/// Identity provider token verification settings
#[derive(Clone)]
pub struct IdpConfig {
    /// HS256 shared secret
    pub jwt_secret: String,
    /// Expected `iss` claim, if the provider sets one
    pub jwt_issuer: Option<String>,
    pub leeway_seconds: u64,
}

impl std::fmt::Debug for IdpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdpConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone)]
pub struct SnowflakeConfig {
    pub worker_id: u16,
}

/// Lifecycle policy knobs
#[derive(Debug, Clone, Default)]
pub struct LifecycleConfig {
    pub same_status: SameStatusPolicy,
    pub transitions: TransitionPolicy,
}

/// List page size bounds
#[derive(Debug, Clone, Copy)]
pub struct PagingConfig {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl PagingConfig {
    #[must_use]
    pub fn limits(&self) -> PageLimits {
        PageLimits::new(self.default_limit, self.max_limit)
    }
}

// Default value functions
fn default_app_name() -> String {
    "grievance-service".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_MIN_CONNECTIONS: u32 = 5;
const DEFAULT_LEEWAY_SECONDS: u64 = 30;
const DEFAULT_REQUESTS_PER_SECOND: u32 = 10;
const DEFAULT_BURST: u32 = 50;
const DEFAULT_PAGE_SIZE: i64 = 10;
const DEFAULT_MAX_PAGE_SIZE: i64 = 100;
const DEFAULT_MIGRATIONS_DIR: &str = "migrations";
const MAX_WORKER_ID: u16 = 1023;

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or
    /// malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        let worker_id: u16 = vars.parse_or("WORKER_ID", 0)?;
        if worker_id > MAX_WORKER_ID {
            return Err(ConfigError::InvalidValue(
                "WORKER_ID",
                format!("{worker_id} exceeds {MAX_WORKER_ID}"),
            ));
        }

        let same_status = match vars.get("SAME_STATUS_POLICY") {
            Some(raw) => SameStatusPolicy::parse(&raw)
                .ok_or(ConfigError::InvalidValue("SAME_STATUS_POLICY", raw))?,
            None => SameStatusPolicy::default(),
        };
        let transitions = match vars.get("TRANSITION_DENY") {
            Some(raw) => TransitionPolicy::permissive_except(&raw)
                .map_err(|e| ConfigError::InvalidValue("TRANSITION_DENY", e.to_string()))?,
            None => TransitionPolicy::permissive(),
        };

        let paging = PagingConfig {
            default_limit: vars.parse_or("PAGE_SIZE_DEFAULT", DEFAULT_PAGE_SIZE)?,
            max_limit: vars.parse_or("PAGE_SIZE_MAX", DEFAULT_MAX_PAGE_SIZE)?,
        };
        if paging.default_limit < 1 || paging.max_limit < paging.default_limit {
            return Err(ConfigError::InvalidValue(
                "PAGE_SIZE_DEFAULT",
                format!(
                    "{} must be between 1 and PAGE_SIZE_MAX ({})",
                    paging.default_limit, paging.max_limit
                ),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(default_app_name),
                env: match vars.get("APP_ENV") {
                    Some(raw) => raw
                        .parse()
                        .map_err(|()| ConfigError::InvalidValue("APP_ENV", raw))?,
                    None => Environment::default(),
                },
            },
            api: ServerConfig {
                host: vars.get("API_HOST").unwrap_or_else(default_host),
                port: vars.parse_required("API_PORT")?,
            },
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars.parse_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
                min_connections: vars.parse_or("DATABASE_MIN_CONNECTIONS", DEFAULT_MIN_CONNECTIONS)?,
                run_migrations: vars.parse_or("DATABASE_RUN_MIGRATIONS", false)?,
                migrations_dir: vars
                    .get("DATABASE_MIGRATIONS_DIR")
                    .unwrap_or_else(|| DEFAULT_MIGRATIONS_DIR.to_string()),
                wards_file: vars.get("WARDS_FILE"),
            },
            idp: IdpConfig {
                jwt_secret: vars.required("IDP_JWT_SECRET")?,
                jwt_issuer: vars.get("IDP_JWT_ISSUER"),
                leeway_seconds: vars.parse_or("IDP_JWT_LEEWAY_SECONDS", DEFAULT_LEEWAY_SECONDS)?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parse_or("RATE_LIMIT_REQUESTS_PER_SECOND", DEFAULT_REQUESTS_PER_SECOND)?,
                burst: vars.parse_or("RATE_LIMIT_BURST", DEFAULT_BURST)?,
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .get("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|origin| !origin.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            snowflake: SnowflakeConfig { worker_id },
            lifecycle: LifecycleConfig {
                same_status,
                transitions,
            },
            paging,
        })
    }
}

/// Typed access to the lookup; blank values count as unset
struct Vars<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Vars<'_, F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::MissingVar(key))
    }

    fn parse_required<T: FromStr>(&self, key: &'static str) -> Result<T, ConfigError> {
        let raw = self.required(key)?;
        raw.parse().map_err(|_| ConfigError::InvalidValue(key, raw))
    }

    fn parse_or<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue(key, raw)),
            None => Ok(default),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
