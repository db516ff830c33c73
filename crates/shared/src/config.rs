//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Object storage configuration.
    pub storage: StorageSettings,
    /// Image processing configuration.
    #[serde(default)]
    pub media: MediaSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Object storage configuration.
///
/// The same service key is sent both as the `apikey` header and as the
/// bearer token, so only one credential is configured.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Base URL of the storage backend, without a trailing slash.
    pub base_url: String,
    /// Service credential.
    pub service_key: String,
    /// Bucket holding listing images.
    #[serde(default = "default_listing_bucket")]
    pub listing_bucket: String,
    /// Bucket holding profile photos.
    #[serde(default = "default_profile_bucket")]
    pub profile_bucket: String,
    /// Bucket holding ownership documents.
    #[serde(default = "default_ownership_bucket")]
    pub ownership_document_bucket: String,
    /// Bucket holding identity documents.
    #[serde(default = "default_identity_bucket")]
    pub identity_document_bucket: String,
    /// Private bucket receiving archived evidence before deletion.
    #[serde(default = "default_evidence_bucket")]
    pub evidence_bucket: String,
    /// Maximum attempts per storage call.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base backoff between attempts, doubled after every failure.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_listing_bucket() -> String {
    "listing-images".to_string()
}

fn default_profile_bucket() -> String {
    "profile-photos".to_string()
}

fn default_ownership_bucket() -> String {
    "rc".to_string()
}

fn default_identity_bucket() -> String {
    "dl".to_string()
}

fn default_evidence_bucket() -> String {
    "deleted-evidence".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Image processing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaSettings {
    /// Text tiled across processed images.
    #[serde(default = "default_watermark_text")]
    pub watermark_text: String,
    /// Maximum width of the front (thumbnail) image.
    #[serde(default = "default_front_width")]
    pub front_width: u32,
    /// Maximum width of every other image.
    #[serde(default = "default_other_width")]
    pub other_width: u32,
    /// Lossy encoder quality, 1-100.
    #[serde(default = "default_quality")]
    pub quality: u8,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            watermark_text: default_watermark_text(),
            front_width: default_front_width(),
            other_width: default_other_width(),
            quality: default_quality(),
        }
    }
}

fn default_watermark_text() -> String {
    "BZR".to_string()
}

fn default_front_width() -> u32 {
    360
}

fn default_other_width() -> u32 {
    1200
}

fn default_quality() -> u8 {
    82
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BAZAAR").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required_env() -> Vec<(&'static str, Option<&'static str>)> {
        vec![
            ("RUN_MODE", Some("test-no-such-file")),
            ("BAZAAR__DATABASE__URL", Some("postgres://localhost/bazaar")),
            ("BAZAAR__STORAGE__BASE_URL", Some("http://storage.local")),
            ("BAZAAR__STORAGE__SERVICE_KEY", Some("service-key")),
        ]
    }

    #[test]
    fn test_load_applies_defaults() {
        temp_env::with_vars(required_env(), || {
            let config = AppConfig::load().expect("config should load");

            assert_eq!(config.server.port, 8080);
            assert_eq!(config.storage.base_url, "http://storage.local");
            assert_eq!(config.storage.listing_bucket, "listing-images");
            assert_eq!(config.storage.evidence_bucket, "deleted-evidence");
            assert_eq!(config.storage.max_retries, 3);
            assert_eq!(config.storage.retry_backoff_ms, 1000);
            assert_eq!(config.media.front_width, 360);
            assert_eq!(config.media.other_width, 1200);
            assert_eq!(config.media.quality, 82);
        });
    }

    #[test]
    fn test_load_env_overrides() {
        let mut vars = required_env();
        vars.push(("BAZAAR__STORAGE__MAX_RETRIES", Some("5")));
        vars.push(("BAZAAR__STORAGE__EVIDENCE_BUCKET", Some("evidence-archive")));
        vars.push(("BAZAAR__MEDIA__WATERMARK_TEXT", Some("MKT")));

        temp_env::with_vars(vars, || {
            let config = AppConfig::load().expect("config should load");

            assert_eq!(config.storage.max_retries, 5);
            assert_eq!(config.storage.evidence_bucket, "evidence-archive");
            assert_eq!(config.media.watermark_text, "MKT");
        });
    }

    #[test]
    fn test_load_requires_storage_credentials() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test-no-such-file")),
                ("BAZAAR__DATABASE__URL", Some("postgres://localhost/bazaar")),
                ("BAZAAR__STORAGE__BASE_URL", None),
                ("BAZAAR__STORAGE__SERVICE_KEY", None),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
