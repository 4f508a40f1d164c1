use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Pool size. Use 1 for `sqlite::memory:` so every query sees the same database.
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory backing the public disk.
    pub root: PathBuf,
    /// URL prefix the public disk is served under.
    pub url_prefix: String,
    /// Hard cap for a single stored file, in bytes.
    pub max_file_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub admin_email: String,
    /// Argon2 PHC string. Generate one with `storeadmin hash-password <password>`.
    pub admin_password_hash: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewsConfig {
    /// HTML `<title>` of the page shell.
    pub title: String,
    /// Asset version; clients holding another version are forced to reload.
    pub asset_version: String,
    /// Script entry point loaded by the page shell.
    pub entry_script: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub views: ViewsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite://storeadmin.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("storage.root", "./storage/app/public")?
            .set_default("storage.url_prefix", "/storage")?
            .set_default("storage.max_file_size", 8 * 1024 * 1024)?
            .set_default("auth.admin_email", "admin@example.com")?
            .set_default("auth.admin_password_hash", "")?
            .set_default("views.title", "Store Admin")?
            .set_default("views.asset_version", "1")?
            .set_default("views.entry_script", "/build/app.js")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., STOREADMIN__DATABASE__URL)
            .add_source(Environment::with_prefix("STOREADMIN").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
