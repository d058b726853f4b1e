//! Application configuration loaded from environment variables.

use views::SupplierStrategy;
use views::error_log::DEFAULT_CAPACITY;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `BACKEND_URL`: base URL of the catalog backend; unset serves the
///   built-in demo collections from memory
/// - `ERROR_LOG_CAPACITY`: error messages kept for `GET /errors` (default: `50`)
/// - `SUPPLIER_STRATEGY`: `fan-out` or `collection` (default: `fan-out`)
///
/// Unparseable values fall back to the default.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub backend_url: Option<String>,
    pub error_log_capacity: usize,
    pub supplier_strategy: SupplierStrategy,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            backend_url: lookup("BACKEND_URL").filter(|url| !url.trim().is_empty()),
            error_log_capacity: lookup("ERROR_LOG_CAPACITY")
                .and_then(|c| c.parse().ok())
                .filter(|c| *c > 0)
                .unwrap_or(defaults.error_log_capacity),
            supplier_strategy: lookup("SUPPLIER_STRATEGY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.supplier_strategy),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            backend_url: None,
            error_log_capacity: DEFAULT_CAPACITY,
            supplier_strategy: SupplierStrategy::FanOut,
        }
    }
}
