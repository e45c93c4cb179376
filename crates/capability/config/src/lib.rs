//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 存储后端。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Redis,
}

/// 后端服务运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub storage_backend: StorageBackend,
    pub redis_url: String,
    pub places_api_key: String,
    pub places_base_url: String,
    pub places_language: String,
    pub photo_max_width: u32,
    pub upstream_timeout_seconds: u64,
    pub sensor_recent_limit: usize,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let places_api_key = read_optional("FINDER_PLACES_API_KEY")
            .ok_or_else(|| ConfigError::Missing("FINDER_PLACES_API_KEY".to_string()))?;
        let http_addr =
            env::var("FINDER_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
        let storage_backend = read_storage_backend("FINDER_STORAGE")?;
        let redis_url =
            env::var("FINDER_REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        let places_base_url = env::var("FINDER_PLACES_BASE_URL")
            .unwrap_or_else(|_| "https://maps.googleapis.com/maps/api".to_string())
            .trim_end_matches('/')
            .to_string();
        let places_language =
            env::var("FINDER_PLACES_LANGUAGE").unwrap_or_else(|_| "ko".to_string());
        let photo_max_width = read_u32_with_default("FINDER_PHOTO_MAX_WIDTH", 400)?;
        let upstream_timeout_seconds =
            read_u64_with_default("FINDER_UPSTREAM_TIMEOUT_SECONDS", 30)?.max(1);
        let sensor_recent_limit = read_u64_with_default("FINDER_SENSOR_RECENT_LIMIT", 100)? as usize;

        Ok(Self {
            http_addr,
            storage_backend,
            redis_url,
            places_api_key,
            places_base_url,
            places_language,
            photo_max_width,
            upstream_timeout_seconds,
            sensor_recent_limit,
        })
    }
}

/// 客户端流水线配置。
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend_url: String,
    pub status_poll_interval_seconds: u64,
    pub fallback_image_url: String,
    pub request_timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:3000".to_string(),
            status_poll_interval_seconds: 10,
            fallback_image_url: "/images/no-image.png".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl ClientConfig {
    /// 从环境变量读取配置，未设置的项使用默认值。
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let backend_url = env::var("FINDER_BACKEND_URL")
            .unwrap_or(defaults.backend_url)
            .trim_end_matches('/')
            .to_string();
        let status_poll_interval_seconds = read_u64_with_default(
            "FINDER_STATUS_POLL_INTERVAL_SECONDS",
            defaults.status_poll_interval_seconds,
        )?;
        if status_poll_interval_seconds == 0 {
            return Err(ConfigError::Invalid(
                "FINDER_STATUS_POLL_INTERVAL_SECONDS".to_string(),
                "0".to_string(),
            ));
        }
        let fallback_image_url =
            read_optional("FINDER_FALLBACK_IMAGE_URL").unwrap_or(defaults.fallback_image_url);
        let request_timeout_seconds = read_u64_with_default(
            "FINDER_CLIENT_TIMEOUT_SECONDS",
            defaults.request_timeout_seconds,
        )?
        .max(1);

        Ok(Self {
            backend_url,
            status_poll_interval_seconds,
            fallback_image_url,
            request_timeout_seconds,
        })
    }
}

fn read_storage_backend(key: &str) -> Result<StorageBackend, ConfigError> {
    match env::var(key) {
        Err(_) => Ok(StorageBackend::Memory),
        Ok(value) => match value.to_ascii_lowercase().as_str() {
            "" | "memory" => Ok(StorageBackend::Memory),
            "redis" => Ok(StorageBackend::Redis),
            _ => Err(ConfigError::Invalid(key.to_string(), value)),
        },
    }
}

fn read_u32_with_default(key: &str, default: u32) -> Result<u32, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u32>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}
