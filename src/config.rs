use std::path::{Path, PathBuf};

use anyhow::Result;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;

use crate::format::TimeFormat;

pub const DEFAULT_API_BASE_URL: &str = "https://api.aladhan.com/v1";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub location: LocationConfig,
    pub hijri: HijriConfig,
    pub display: DisplayConfig,
    pub network: NetworkConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocationConfig {
    pub city: String,
    pub country: String,
    /// Aladhan calculation method id (2 = ISNA)
    pub method: u32,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            city: String::new(),
            country: String::new(),
            method: 2,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct HijriConfig {
    /// Days added to API-reported Hijri dates to match local moon sighting
    pub date_offset: i32,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DisplayConfig {
    pub time_format: TimeFormat,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, `config.toml` files and `RAMADAN__*`
    /// environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file (silently ignore if not present)
        let _ = dotenvy::dotenv();

        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ramadan-times");

        let builder = Self::defaults()?
            // Local config file (optional, lowest priority)
            .add_source(File::from(PathBuf::from("config.toml")).required(false))
            // User config directory (optional, overrides local)
            .add_source(File::from(config_dir.join("config.toml")).required(false))
            // Environment variables (RAMADAN__HIJRI__DATE_OFFSET=-1)
            .add_source(Environment::with_prefix("RAMADAN").separator("__"));

        let s = builder.build()?;
        Ok(s.try_deserialize()?)
    }

    /// Load configuration from an explicit file layered over the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let builder = Self::defaults()?
            .add_source(File::from(path.to_path_buf()).required(true))
            .add_source(Environment::with_prefix("RAMADAN").separator("__"));

        let s = builder.build()?;
        Ok(s.try_deserialize()?)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            // Location
            .set_default("location.city", "")?
            .set_default("location.country", "")?
            .set_default("location.method", 2)?
            // Hijri
            .set_default("hijri.date_offset", 0)?
            // Display
            .set_default("display.time_format", "system")?
            // Network
            .set_default("network.request_timeout_secs", 30)?
            .set_default("network.connect_timeout_secs", 10)?
            // API
            .set_default("api.base_url", DEFAULT_API_BASE_URL)?)
    }
}
