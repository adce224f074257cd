use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub proximity: ProximityConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 3000, worker_threads: Some(4), log_format: default_log_format() }
    }
}

fn default_log_format() -> String { "compact".into() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    /// Apply pending migrations on startup.
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            run_migrations: true,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_true() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: String::new(), token_ttl_hours: default_token_ttl() }
    }
}

fn default_token_ttl() -> i64 { 24 }

#[derive(Debug, Clone, Deserialize)]
pub struct ProximityConfig {
    #[serde(default = "default_max_distance")]
    pub default_max_distance_km: f64,
    #[serde(default = "default_earth_radius")]
    pub earth_radius_km: f64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self { default_max_distance_km: default_max_distance(), earth_radius_km: default_earth_radius() }
    }
}

fn default_max_distance() -> f64 { 10.0 }
fn default_earth_radius() -> f64 { 6371.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_geocoder_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_geocoder_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_geocoder_timeout(),
            cache_capacity: default_cache_capacity(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_geocoder_url() -> String { "https://nominatim.openstreetmap.org".into() }
fn default_user_agent() -> String { concat!("marketplace/", env!("CARGO_PKG_VERSION")).into() }
fn default_geocoder_timeout() -> u64 { 10 }
fn default_cache_capacity() -> u64 { 10_000 }
fn default_cache_ttl() -> u64 { 86_400 }

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_from_file(&path)
}

/// Load from an explicit path, or from `config.toml` when none is given.
///
/// Only a missing `config.toml` falls back to defaults; an explicit path that
/// does not exist, unreadable files and malformed TOML are errors.
pub fn load_or_default(explicit_path: Option<&str>) -> Result<AppConfig> {
    if let Some(path) = explicit_path {
        return load_from_file(path)
            .map_err(|e| anyhow!("failed to load config from {path}: {e}"));
    }
    match std::fs::read_to_string(DEFAULT_CONFIG_PATH) {
        Ok(content) => parse(&content).map_err(|e| anyhow!("invalid {DEFAULT_CONFIG_PATH}: {e}")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(anyhow!("failed to read {DEFAULT_CONFIG_PATH}: {e}")),
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load the file named by `CONFIG_PATH` (or `config.toml`), falling back
    /// to an all-defaults config filled from the environment only when
    /// `CONFIG_PATH` is unset and `config.toml` is absent, then validate.
    pub fn load_and_validate() -> Result<Self> {
        let explicit = std::env::var("CONFIG_PATH").ok().filter(|p| !p.trim().is_empty());
        Self::load_and_validate_from(explicit.as_deref())
    }

    pub fn load_and_validate_from(explicit_path: Option<&str>) -> Result<Self> {
        let mut cfg = load_or_default(explicit_path)?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env();
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.auth.normalize_from_env();
        self.auth.validate()?;
        self.proximity.validate()?;
        self.geocoder.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            if !host.trim().is_empty() { self.host = host; }
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn normalize_from_env(&mut self) {
        if self.jwt_secret.trim().is_empty() {
            if let Ok(secret) = std::env::var("JWT_SECRET") {
                self.jwt_secret = secret;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret is empty; set it in config.toml or JWT_SECRET"));
        }
        if self.token_ttl_hours <= 0 {
            return Err(anyhow!("auth.token_ttl_hours must be positive"));
        }
        Ok(())
    }
}

impl ProximityConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.default_max_distance_km.is_finite() && self.default_max_distance_km > 0.0) {
            return Err(anyhow!("proximity.default_max_distance_km must be a positive number"));
        }
        if !(self.earth_radius_km.is_finite() && self.earth_radius_km > 0.0) {
            return Err(anyhow!("proximity.earth_radius_km must be a positive number"));
        }
        Ok(())
    }
}

impl GeocoderConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(anyhow!("geocoder.base_url must start with http(s)"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(anyhow!("geocoder.user_agent is required by the Nominatim usage policy"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("geocoder.timeout_secs must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [server]
        host = "0.0.0.0"
        port = 8080

        [database]
        url = "postgres://u:p@localhost:5432/market"

        [auth]
        jwt_secret = "s3cret"

        [proximity]
        default_max_distance_km = 25.0
    "#;

    #[test]
    fn parses_sections_and_fills_defaults() {
        let cfg = parse(SAMPLE).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.log_format, "compact");
        assert_eq!(cfg.database.max_connections, 10);
        assert!(cfg.database.run_migrations);
        assert_eq!(cfg.auth.token_ttl_hours, 24);
        assert_eq!(cfg.proximity.default_max_distance_km, 25.0);
        assert_eq!(cfg.proximity.earth_radius_km, 6371.0);
        assert!(cfg.geocoder.enabled);
        assert!(cfg.geocoder.base_url.contains("nominatim"));
    }

    #[test]
    fn validates_complete_config() {
        let mut cfg = parse(SAMPLE).unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    #[test]
    fn rejects_non_postgres_url() {
        let db = DatabaseConfig { url: "mysql://localhost/db".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_default_radius() {
        let p = ProximityConfig { default_max_distance_km: 0.0, ..ProximityConfig::default() };
        assert!(p.validate().is_err());
        let p = ProximityConfig { default_max_distance_km: f64::NAN, ..ProximityConfig::default() };
        assert!(p.validate().is_err());
    }

    #[test]
    fn disabled_geocoder_skips_url_checks() {
        let g = GeocoderConfig { enabled: false, base_url: String::new(), ..GeocoderConfig::default() };
        assert!(g.validate().is_ok());
    }

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("configs-{}-{}.toml", name, std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = write_temp("malformed", "[proximity]\ndefault_max_distance_km = \"five\"\n[server\nport = 9999\n");
        let res = AppConfig::load_and_validate_from(path.to_str());
        let _ = std::fs::remove_file(&path);
        assert!(res.is_err());
    }

    #[test]
    fn wrong_types_are_an_error() {
        let path = write_temp("types", "[proximity]\ndefault_max_distance_km = \"five\"\n");
        let res = load_or_default(path.to_str());
        let _ = std::fs::remove_file(&path);
        assert!(res.is_err());
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let path = std::env::temp_dir().join("configs-definitely-missing-7f3a.toml");
        let err = load_or_default(path.to_str()).unwrap_err();
        assert!(err.to_string().contains("failed to load config"));
    }

    #[test]
    fn explicit_file_is_loaded_and_validated() {
        let path = write_temp("sample", SAMPLE);
        let cfg = AppConfig::load_and_validate_from(path.to_str());
        let _ = std::fs::remove_file(&path);
        let cfg = cfg.unwrap();
        assert_eq!(cfg.database.url, "postgres://u:p@localhost:5432/market");
        assert_eq!(cfg.proximity.default_max_distance_km, 25.0);
    }

    #[test]
    fn rejects_empty_jwt_secret() {
        let a = AuthConfig { jwt_secret: " ".into(), token_ttl_hours: 24 };
        assert!(a.validate().is_err());
    }
}
