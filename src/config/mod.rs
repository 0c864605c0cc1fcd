//! Application configuration from environment variables.

use crate::storage::StorageConfig;
use std::env;
use std::net::SocketAddr;

/// Default cap on request bodies that carry no more specific limit.
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024; // 1 MiB
/// Default cap on a single uploaded photo.
pub const DEFAULT_MAX_PHOTO_SIZE: usize = 8 * 1024 * 1024; // 8 MiB
/// Default creation-endpoint quota: requests allowed per window per client+action.
pub const DEFAULT_RATE_LIMIT_QUOTA: u32 = 10;
/// Default creation-endpoint quota window, in seconds.
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host and port
    pub server_addr: SocketAddr,

    /// Database connection URL
    pub database_url: String,

    /// S3-compatible storage configuration
    pub s3_endpoint: Option<String>,
    pub s3_bucket: String,
    pub s3_access_key: Option<String>,
    pub s3_secret_key: Option<String>,
    pub s3_public_base_url: Option<String>,

    /// Shared secret used to verify bearer tokens issued by the auth service.
    pub jwt_secret: String,

    /// Maximum accepted JSON/form body size, in bytes.
    pub max_body_size: usize,
    /// Maximum accepted photo upload size, in bytes.
    pub max_photo_size: usize,

    /// Requests allowed per client+action within `rate_limit_window_secs`.
    pub rate_limit_quota: u32,
    /// Width of the rate-limit window, in seconds.
    pub rate_limit_window_secs: u64,

    /// CORS allowed origins (comma-separated)
    pub cors_origins: Vec<String>,

    /// Log level filter
    pub log_filter: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `DATABASE_URL`: PostgreSQL connection string
    /// - `S3_BUCKET`: S3 bucket name for photo storage
    /// - `JWT_SECRET`: shared secret for verifying bearer tokens
    ///
    /// Optional variables:
    /// - `HOST`: Server host (default: 0.0.0.0)
    /// - `PORT`: Server port (default: 3001)
    /// - `S3_ENDPOINT`: S3 endpoint URL (default: AWS S3)
    /// - `S3_ACCESS_KEY` / `S3_SECRET_KEY`: S3 credentials
    /// - `S3_PUBLIC_BASE_URL`: base URL used to build public photo URLs
    /// - `MAX_BODY_SIZE`: request body cap in bytes (default: 1 MiB)
    /// - `MAX_PHOTO_SIZE`: photo upload cap in bytes (default: 8 MiB)
    /// - `RATE_LIMIT_QUOTA` / `RATE_LIMIT_WINDOW_SECS`: creation-endpoint throttle
    /// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
    /// - `RUST_LOG`: Log level filter (default: api=debug,tower_http=debug)
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let server_addr = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress)?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?;

        let s3_bucket =
            env::var("S3_BUCKET").map_err(|_| ConfigError::Missing("S3_BUCKET".to_string()))?;

        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET".to_string()))?;

        let cors_origins = parse_cors_origins();
        let log_filter = default_log_filter();

        Ok(Config {
            server_addr,
            database_url,
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            s3_bucket,
            s3_access_key: env::var("S3_ACCESS_KEY").ok(),
            s3_secret_key: env::var("S3_SECRET_KEY").ok(),
            s3_public_base_url: env::var("S3_PUBLIC_BASE_URL").ok(),
            jwt_secret,
            max_body_size: parse_usize_or("MAX_BODY_SIZE", DEFAULT_MAX_BODY_SIZE),
            max_photo_size: parse_usize_or("MAX_PHOTO_SIZE", DEFAULT_MAX_PHOTO_SIZE),
            rate_limit_quota: parse_u32_or("RATE_LIMIT_QUOTA", DEFAULT_RATE_LIMIT_QUOTA),
            rate_limit_window_secs: parse_u64_or(
                "RATE_LIMIT_WINDOW_SECS",
                DEFAULT_RATE_LIMIT_WINDOW_SECS,
            ),
            cors_origins,
            log_filter,
        })
    }

    /// Load configuration, allowing missing optional values for development.
    /// This is useful when running without a full environment set up.
    pub fn from_env_or_defaults() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .unwrap_or(3001);

        let server_addr = format!("{}:{}", host, port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 3001)));

        Config {
            server_addr,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/civic_tickets_dev".to_string()),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            s3_bucket: env::var("S3_BUCKET").unwrap_or_else(|_| "civic-tickets-dev".to_string()),
            s3_access_key: env::var("S3_ACCESS_KEY").ok(),
            s3_secret_key: env::var("S3_SECRET_KEY").ok(),
            s3_public_base_url: env::var("S3_PUBLIC_BASE_URL").ok(),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-do-not-use".to_string()),
            max_body_size: parse_usize_or("MAX_BODY_SIZE", DEFAULT_MAX_BODY_SIZE),
            max_photo_size: parse_usize_or("MAX_PHOTO_SIZE", DEFAULT_MAX_PHOTO_SIZE),
            rate_limit_quota: parse_u32_or("RATE_LIMIT_QUOTA", DEFAULT_RATE_LIMIT_QUOTA),
            rate_limit_window_secs: parse_u64_or(
                "RATE_LIMIT_WINDOW_SECS",
                DEFAULT_RATE_LIMIT_WINDOW_SECS,
            ),
            cors_origins: parse_cors_origins(),
            log_filter: default_log_filter(),
        }
    }

    /// Create a StorageConfig from this Config.
    ///
    /// Uses the S3 configuration values (endpoint, bucket, credentials)
    /// to build a StorageConfig for initializing the storage client.
    pub fn storage_config(&self) -> StorageConfig {
        let mut config = StorageConfig::new(self.s3_bucket.clone());

        if let Some(endpoint) = &self.s3_endpoint {
            config = config.with_endpoint(endpoint);
            // Extract region from endpoint for S3-compatible services
            // e.g., "https://nyc3.digitaloceanspaces.com" -> "nyc3"
            if let Some(region) = extract_region_from_endpoint(endpoint) {
                config = config.with_region(region);
            }
        }

        if let (Some(access_key), Some(secret_key)) = (&self.s3_access_key, &self.s3_secret_key) {
            config = config.with_credentials(access_key, secret_key);
        }

        if let Some(base_url) = &self.s3_public_base_url {
            config = config.with_public_base_url(base_url);
        }

        config
    }
}

fn parse_cors_origins() -> Vec<String> {
    env::var("CORS_ORIGINS")
        .unwrap_or_else(|_| "*".to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .collect()
}

fn default_log_filter() -> String {
    env::var("RUST_LOG").unwrap_or_else(|_| "api=debug,tower_http=debug".to_string())
}

fn parse_usize_or(var: &str, default: usize) -> usize {
    env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_u32_or(var: &str, default: u32) -> u32 {
    env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_u64_or(var: &str, default: u64) -> u64 {
    env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Extract region from S3-compatible endpoint URL.
/// For DigitalOcean Spaces: "https://nyc3.digitaloceanspaces.com" -> "nyc3"
fn extract_region_from_endpoint(endpoint: &str) -> Option<String> {
    // Remove protocol
    let without_protocol = endpoint
        .strip_prefix("https://")
        .or_else(|| endpoint.strip_prefix("http://"))
        .unwrap_or(endpoint);

    // Get the first part before the dot
    without_protocol
        .split('.')
        .next()
        .map(|s| s.to_string())
        .filter(|s| !s.is_empty())
}

/// Configuration loading errors.
#[derive(Debug)]
pub enum ConfigError {
    Missing(String),
    InvalidPort,
    InvalidAddress,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(var) => {
                write!(f, "Missing required environment variable: {}", var)
            }
            ConfigError::InvalidPort => write!(f, "Invalid PORT value"),
            ConfigError::InvalidAddress => write!(f, "Invalid server address"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_or_defaults() {
        // Should not panic even with no env vars set
        let config = Config::from_env_or_defaults();
        assert_eq!(config.server_addr.port(), 3001);
        assert!(!config.cors_origins.is_empty());
        assert_eq!(config.max_body_size, DEFAULT_MAX_BODY_SIZE);
        assert_eq!(config.max_photo_size, DEFAULT_MAX_PHOTO_SIZE);
        assert_eq!(config.rate_limit_quota, DEFAULT_RATE_LIMIT_QUOTA);
    }

    #[test]
    fn test_extract_region_from_endpoint() {
        // DigitalOcean Spaces
        assert_eq!(
            extract_region_from_endpoint("https://nyc3.digitaloceanspaces.com"),
            Some("nyc3".to_string())
        );
        assert_eq!(
            extract_region_from_endpoint("https://sfo2.digitaloceanspaces.com"),
            Some("sfo2".to_string())
        );

        // Without protocol
        assert_eq!(
            extract_region_from_endpoint("nyc3.digitaloceanspaces.com"),
            Some("nyc3".to_string())
        );

        // HTTP protocol
        assert_eq!(
            extract_region_from_endpoint("http://localhost:9000"),
            Some("localhost:9000".to_string())
        );

        // Empty or invalid
        assert_eq!(extract_region_from_endpoint(""), None);
    }

    #[test]
    fn test_storage_config_from_config() {
        let config = Config::from_env_or_defaults();
        let storage_config = config.storage_config();

        // Should use the bucket from config
        assert_eq!(storage_config.bucket, config.s3_bucket);
    }
}
