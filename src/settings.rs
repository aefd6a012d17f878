use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Data {
    pub dashboard_file: PathBuf,
    pub activity_log: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub url: String,
}

impl Database {
    /// On-disk file behind a `sqlite://` url; `None` for in-memory databases.
    pub fn file_path(&self) -> Option<PathBuf> {
        let rest = self.url.strip_prefix("sqlite://").or_else(|| self.url.strip_prefix("sqlite:"))?;
        let path = rest.split('?').next().unwrap_or_default();
        if path.is_empty() || path == ":memory:" {
            return None;
        }
        Some(PathBuf::from(path))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Generator {
    pub enabled: bool,
    pub program: String,
    pub script: PathBuf,
    pub timeout_secs: u64,
}

impl Generator {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Auth {
    pub session_ttl_hours: i64,
    pub remember_me_days: i64,
    pub demo_remember_me_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub data: Data,
    pub database: Database,
    pub generator: Generator,
    pub auth: Auth,
}

impl Settings {
    /// Defaults, then `Config.toml` if present, then `INNOSTART__SECTION__KEY` variables.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_file("Config.toml")
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.static_dir", "public")?
            .set_default("data.dashboard_file", "data/dashboard_data.json")?
            .set_default("data.activity_log", "logs/user_activities.log")?
            .set_default("database.url", "sqlite://data/innostart.db?mode=rwc")?
            .set_default("generator.enabled", false)?
            .set_default("generator.program", "python3")?
            .set_default("generator.script", "ml_models/musanze_api.py")?
            .set_default("generator.timeout_secs", 10)?
            .set_default("auth.session_ttl_hours", 24)?
            .set_default("auth.remember_me_days", 7)?
            .set_default("auth.demo_remember_me_days", 30)?
            .add_source(File::with_name(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix("INNOSTART").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
