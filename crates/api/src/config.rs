/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    pub coupons: CouponSettings,
}

/// Coupon-specific settings.
#[derive(Debug, Clone)]
pub struct CouponSettings {
    /// Skip the coupon template requirement when adding coupons.
    pub test_mode: bool,
    /// Query cache entry lifetime in seconds.
    pub cache_ttl_secs: u64,
    /// Maximum number of cached query results.
    pub cache_capacity: u64,
    /// Integration ids enabled at startup.
    pub enabled_integrations: Vec<String>,
}

impl Default for CouponSettings {
    fn default() -> Self {
        Self {
            test_mode: false,
            cache_ttl_secs: 3600,
            cache_capacity: 10_000,
            enabled_integrations: vec!["store".to_string()],
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `30`                    |
    /// | `COUPONS_TEST_MODE`      | `false`                 |
    /// | `COUPONS_CACHE_TTL_SECS` | `3600`                  |
    /// | `COUPONS_CACHE_CAPACITY` | `10000`                 |
    /// | `ENABLED_INTEGRATIONS`   | `store`                 |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = split_list(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let test_mode = std::env::var("COUPONS_TEST_MODE")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let cache_ttl_secs: u64 = std::env::var("COUPONS_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("COUPONS_CACHE_TTL_SECS must be a valid u64");

        let cache_capacity: u64 = std::env::var("COUPONS_CACHE_CAPACITY")
            .unwrap_or_else(|_| "10000".into())
            .parse()
            .expect("COUPONS_CACHE_CAPACITY must be a valid u64");

        let enabled_integrations =
            split_list(&std::env::var("ENABLED_INTEGRATIONS").unwrap_or_else(|_| "store".into()));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            coupons: CouponSettings {
                test_mode,
                cache_ttl_secs,
                cache_capacity,
                enabled_integrations,
            },
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
