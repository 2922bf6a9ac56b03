use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

use crate::pagination::MAX_LIMIT;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub pagination: PaginationConfig,
    pub collections: CollectionConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_expiry_hours: u64,
    pub enable_login: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    pub control: String,
    pub create: String,
    pub consume: String,
    pub grade: String,
    pub testrun: String,
    pub enumerators: String,
    pub versions: String,
}

impl CollectionConfig {
    pub fn all(&self) -> Vec<&str> {
        vec![
            &self.control,
            &self.create,
            &self.consume,
            &self.grade,
            &self.testrun,
            &self.enumerators,
            &self.versions,
        ]
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            control: "Control".to_string(),
            create: "Create".to_string(),
            consume: "Consume".to_string(),
            grade: "Grade".to_string(),
            testrun: "TestRun".to_string(),
            enumerators: "Enumerators".to_string(),
            versions: "Versions".to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set outside development")]
    MissingJwtSecret,

    #[error("PAGINATION_DEFAULT_LIMIT must be between 1 and 100, got {0}")]
    InvalidDefaultLimit(i64),

    #[error("ENABLE_LOGIN is not allowed in production")]
    LoginInProduction,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("API_HOST") {
            self.server.host = v;
        }
        if let Some(v) = env::var("API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("ENABLE_CORS") {
            self.server.enable_cors = v.parse().unwrap_or(self.server.enable_cors);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_ISSUER") {
            self.security.jwt_issuer = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("ENABLE_LOGIN") {
            self.security.enable_login = v.parse().unwrap_or(self.security.enable_login);
        }

        // Pagination overrides
        if let Ok(v) = env::var("PAGINATION_DEFAULT_LIMIT") {
            self.pagination.default_limit = v.parse().unwrap_or(self.pagination.default_limit);
        }

        // Collection names
        let collections = &mut self.collections;
        for (var, slot) in [
            ("CONTROL_COLLECTION_NAME", &mut collections.control),
            ("CREATE_COLLECTION_NAME", &mut collections.create),
            ("CONSUME_COLLECTION_NAME", &mut collections.consume),
            ("GRADE_COLLECTION_NAME", &mut collections.grade),
            ("TESTRUN_COLLECTION_NAME", &mut collections.testrun),
            ("ENUMERATORS_COLLECTION_NAME", &mut collections.enumerators),
            ("VERSIONS_COLLECTION_NAME", &mut collections.versions),
        ] {
            if let Ok(v) = env::var(var) {
                *slot = v;
            }
        }

        self
    }

    /// Reject combinations the server must not start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment != Environment::Development && self.security.jwt_secret.is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }
        if !(1..=MAX_LIMIT).contains(&self.pagination.default_limit) {
            return Err(ConfigError::InvalidDefaultLimit(self.pagination.default_limit));
        }
        if self.environment == Environment::Production && self.security.enable_login {
            return Err(ConfigError::LoginInProduction);
        }
        Ok(())
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8184,
                enable_cors: true,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: "local-dev-secret".to_string(),
                jwt_issuer: "dev-idp".to_string(),
                jwt_expiry_hours: 24,
                enable_login: true,
            },
            pagination: PaginationConfig { default_limit: 10 },
            collections: CollectionConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8184,
                enable_cors: true,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_issuer: "dev-idp".to_string(),
                jwt_expiry_hours: 8,
                enable_login: false,
            },
            pagination: PaginationConfig { default_limit: 10 },
            collections: CollectionConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8184,
                enable_cors: false,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_issuer: "dev-idp".to_string(),
                jwt_expiry_hours: 4,
                enable_login: false,
            },
            pagination: PaginationConfig { default_limit: 10 },
            collections: CollectionConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(config.security.enable_login);
        assert_eq!(config.pagination.default_limit, 10);
        assert_eq!(config.collections.control, "Control");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_production_config() {
        let mut config = AppConfig::production();
        assert!(!config.security.enable_login);
        assert_eq!(config.validate(), Err(ConfigError::MissingJwtSecret));

        config.security.jwt_secret = "s3cret".to_string();
        assert!(config.validate().is_ok());

        config.security.enable_login = true;
        assert_eq!(config.validate(), Err(ConfigError::LoginInProduction));
    }

    #[test]
    fn test_default_limit_must_be_in_range() {
        let mut config = AppConfig::development();
        config.pagination.default_limit = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidDefaultLimit(0)));
        config.pagination.default_limit = 101;
        assert_eq!(config.validate(), Err(ConfigError::InvalidDefaultLimit(101)));
    }

    #[test]
    fn test_serialized_config_hides_secret() {
        let value = serde_json::to_value(AppConfig::development()).unwrap();
        assert!(value["security"].get("jwt_secret").is_none());
        assert_eq!(value["environment"], "development");
    }
}
