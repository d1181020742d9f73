use std::env;

use auth::AuthenticatorConfig;
use auth::HashingCost;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Longest session lifetime accepted for `jwt.expiration_hours` (one year)
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL URL; the in-memory store is used when absent
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub expiration_hours: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

/// Argon2id cost for new password hashes
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (IDENTITY_JWT__SECRET, IDENTITY_SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults (every key except `jwt.secret`)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        let cost = HashingCost::default();

        let configuration = ConfigBuilder::builder()
            .set_default("database.max_connections", 5_i64)?
            .set_default("server.http_port", 5000_i64)?
            .set_default("jwt.issuer", "legiscounsel")?
            .set_default("jwt.expiration_hours", 24_i64 * 7)?
            .set_default("password.memory_kib", i64::from(cost.memory_kib))?
            .set_default("password.iterations", i64::from(cost.iterations))?
            .set_default("password.parallelism", i64::from(cost.parallelism))?
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (IDENTITY_ prefix, __ as separator)
            // Example: IDENTITY_JWT__SECRET=... overrides jwt.secret
            .add_source(
                Environment::with_prefix("IDENTITY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service cannot run safely with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < auth::jwt::MIN_SECRET_LENGTH {
            return Err(ConfigError::Message(format!(
                "jwt.secret must be at least {} bytes",
                auth::jwt::MIN_SECRET_LENGTH
            )));
        }

        if self.jwt.expiration_hours <= 0 || self.jwt.expiration_hours > MAX_EXPIRATION_HOURS {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be between 1 and {}, got {}",
                MAX_EXPIRATION_HOURS, self.jwt.expiration_hours
            )));
        }

        auth::PasswordHasher::new(self.hashing_cost())
            .map_err(|e| ConfigError::Message(format!("password: {}", e)))?;

        Ok(())
    }

    pub fn hashing_cost(&self) -> HashingCost {
        HashingCost {
            memory_kib: self.password.memory_kib,
            iterations: self.password.iterations,
            parallelism: self.password.parallelism,
        }
    }

    pub fn authenticator_config(&self) -> AuthenticatorConfig {
        AuthenticatorConfig {
            secret: self.jwt.secret.as_bytes().to_vec(),
            issuer: self.jwt.issuer.clone(),
            token_ttl: chrono::Duration::hours(self.jwt.expiration_hours),
            hashing_cost: self.hashing_cost(),
        }
    }
}
