use rocket::figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    pub campus: CampusConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub address: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    /// HMAC secret for signing bearer tokens. Must be overridden outside dev.
    pub token_secret: String,
    pub token_ttl_minutes: i64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CampusConfig {
    /// IANA timezone the exam timetable is published in. Session create
    /// payloads carry naive wall-clock times interpreted in this zone.
    pub timezone: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/authentikate".to_string(),
            max_connections: 16,
            min_connections: 4,
            acquire_timeout: 5,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            address: "127.0.0.1".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: "dev-only-secret".to_string(),
            token_ttl_minutes: 60,
        }
    }
}

impl Default for CampusConfig {
    fn default() -> Self {
        Self {
            timezone: "Africa/Lagos".to_string(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            auth: AuthConfig::default(),
            campus: CampusConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. Authentikate.toml (base configuration file)
    /// 2. Environment variables (prefixed with AUTHENTIKATE_)
    /// 3. DATABASE_URL environment variable (for deployment convenience)
    pub fn load() -> Result<Self, figment::Error> {
        let figment = Figment::new()
            .merge(Toml::string(&toml::to_string(&Config::default()).unwrap()).nested())
            .merge(Toml::file("Authentikate.toml").nested())
            .merge(Env::prefixed("AUTHENTIKATE_").split("_"))
            .merge(Env::raw().only(&["DATABASE_URL"]).map(|_| "database.url".into()));

        figment.extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.campus.timezone, "Africa/Lagos");
        assert_eq!(config.auth.token_ttl_minutes, 60);
    }

    #[test]
    fn campus_timezone_parses() {
        let config = Config::default();
        assert!(config.campus.timezone.parse::<chrono_tz::Tz>().is_ok());
    }
}
