use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

const DEV_JWT_SECRET: &str = "catalogo-dev-secret-change-me";

/// One year
const MAX_JWT_EXPIRY_HOURS: u64 = 24 * 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(skip_serializing)]
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// `["*"]` allows any origin
    pub cors_origins: Vec<String>,
}

impl SecurityConfig {
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.jwt_expiry_hours.min(MAX_JWT_EXPIRY_HOURS) as i64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_image_bytes: usize,
    pub allowed_extensions: Vec<String>,
}

impl AppConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let jwt_secret = match lookup("JWT_SECRET").filter(|v| !v.is_empty()) {
            Some(secret) => secret,
            None if environment == Environment::Development => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
            None => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        // Set defaults based on environment, then override with specific env vars
        let mut config = match environment {
            Environment::Production => Self::production(database_url, jwt_secret),
            Environment::Staging => Self::staging(database_url, jwt_secret),
            Environment::Development => Self::development(database_url, jwt_secret),
        };
        config.apply_overrides(&lookup)?;
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("CATALOGO_API_PORT").or_else(|| lookup("PORT")) {
            self.server.port = parse("PORT", &v)?;
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse("DATABASE_CONNECTION_TIMEOUT", &v)?;
        }

        // API overrides
        if let Some(v) = lookup("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = parse("API_ENABLE_REQUEST_LOGGING", &v)?;
        }
        if let Some(v) = lookup("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = parse("API_MAX_REQUEST_SIZE_BYTES", &v)?;
        }

        // Security overrides
        if let Some(v) = lookup("JWT_EXPIRY_HOURS") {
            let hours: u64 = parse("JWT_EXPIRY_HOURS", &v)?;
            if hours == 0 || hours > MAX_JWT_EXPIRY_HOURS {
                return Err(ConfigError::Invalid {
                    key: "JWT_EXPIRY_HOURS",
                    value: v,
                });
            }
            self.security.jwt_expiry_hours = hours;
        }
        if let Some(v) = lookup("CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Upload overrides
        if let Some(v) = lookup("UPLOAD_DIR") {
            self.uploads.dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("UPLOAD_MAX_IMAGE_BYTES") {
            self.uploads.max_image_bytes = parse("UPLOAD_MAX_IMAGE_BYTES", &v)?;
        }

        Ok(())
    }

    fn development(database_url: String, jwt_secret: String) -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: database_url,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_hours: 1,
                cors_origins: vec!["http://localhost:5173".to_string()],
            },
            uploads: UploadConfig::default(),
        }
    }

    fn staging(database_url: String, jwt_secret: String) -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: database_url,
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024,
            },
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_hours: 1,
                cors_origins: Vec::new(),
            },
            uploads: UploadConfig::default(),
        }
    }

    fn production(database_url: String, jwt_secret: String) -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: database_url,
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 6 * 1024 * 1024, // image cap plus form fields
            },
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_hours: 1,
                cors_origins: Vec::new(),
            },
            uploads: UploadConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_image_bytes: 5 * 1024 * 1024, // 5MB
            allowed_extensions: ["png", "jpg", "jpeg", "gif"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/catalogo")])).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.security.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.security.jwt_expiry_hours, 1);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.uploads.allowed_extensions, vec!["png", "jpg", "jpeg", "gif"]);
    }

    #[test]
    fn test_production_requires_jwt_secret() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("APP_ENV", "production"),
            ("DATABASE_URL", "postgres://db/catalogo"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn test_database_url_is_required() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("APP_ENV", "prod"),
            ("DATABASE_URL", "postgres://db/catalogo"),
            ("JWT_SECRET", "s3cret"),
            ("PORT", "8080"),
            ("CATALOGO_API_PORT", "9090"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("UPLOAD_DIR", "/var/lib/catalogo/uploads"),
        ]))
        .unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.security.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(config.uploads.dir, PathBuf::from("/var/lib/catalogo/uploads"));
        assert!(!config.api.enable_request_logging);
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/catalogo"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn test_jwt_expiry_is_bounded() {
        for hours in ["0", "8761", "9223372036854775807"] {
            let err = AppConfig::from_lookup(lookup_from(&[
                ("DATABASE_URL", "postgres://db/catalogo"),
                ("JWT_EXPIRY_HOURS", hours),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { key: "JWT_EXPIRY_HOURS", .. }));
        }

        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/catalogo"),
            ("JWT_EXPIRY_HOURS", "8760"),
        ]))
        .unwrap();
        assert_eq!(config.security.token_ttl(), chrono::Duration::hours(8760));
    }
}
