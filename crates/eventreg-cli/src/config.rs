use eventreg_http::HttpStoreConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        if self.store.backend == StoreBackend::Http {
            self.store
                .http
                .validate()
                .map_err(|e| format!("store.http: {e}"))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Where registrations are read from and written to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Http,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub http: HttpStoreConfig,
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub const DEFAULT_CONFIG_FILE: &str = "eventreg.toml";
    pub const ENV_PREFIX: &str = "EVENTREG";

    /// Loads `path` (or `eventreg.toml` when present) with
    /// `EVENTREG__SECTION__KEY` overrides on top.
    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        load_config_with_prefix(path, ENV_PREFIX)
    }

    pub fn load_config_with_prefix(path: Option<&str>, prefix: &str) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                let pathbuf = PathBuf::from(p);
                if !pathbuf.exists() {
                    return Err(format!("config file not found: {p}"));
                }
                builder = builder.add_source(File::from(pathbuf));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // e.g. EVENTREG__STORE__BACKEND=http
        builder = builder.add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("__")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}
