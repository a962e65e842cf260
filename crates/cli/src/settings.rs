//! Layered settings: built-in defaults, optional TOML file, `QUEUESNIP_*` env
//!
//! # Example `shop.toml`
//!
//! ```text
//! state_path = "/var/lib/queuesnip/queue.json"
//! refresh_secs = 30
//!
//! [[services]]
//! id = "haircut"
//! name = "Haircut"
//! duration_minutes = 30
//! price = 45
//!
//! [[barbers]]
//! id = 1
//! name = "Alex Johnson"
//! active = true
//! ```

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use queuesnip_core::domain::{Barber, Service, ShopConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "QUEUESNIP";
const CONFIG_FILE_NAME: &str = "shop.toml";
const STATE_FILE_NAME: &str = "queue.json";

/// Board refresh period for `watch` (seconds)
pub const DEFAULT_REFRESH_SECS: u64 = 60;

#[derive(Debug, Deserialize)]
struct RawSettings {
    #[serde(default)]
    state_path: Option<PathBuf>,
    refresh_secs: u64,
    #[serde(default)]
    services: Option<Vec<Service>>,
    #[serde(default)]
    barbers: Option<Vec<Barber>>,
}

/// Resolved settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub shop: ShopConfig,
    pub state_path: PathBuf,
    pub refresh_secs: u64,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "queuesnip")
}

/// `<config dir>/queuesnip/shop.toml`, or `./.queuesnip/shop.toml` without a home
pub fn default_config_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(".queuesnip").join(CONFIG_FILE_NAME))
}

/// `<data dir>/queuesnip/queue.json`, or `./.queuesnip/queue.json` without a home
pub fn default_state_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(STATE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(".queuesnip").join(STATE_FILE_NAME))
}

impl Settings {
    /// Load settings
    ///
    /// # Arguments
    /// * `config_path` - Explicit config file (must exist); `None` reads the
    ///   default location if present
    /// * `state_override` - Explicit state file, wins over every other layer
    pub fn load(config_path: Option<&Path>, state_override: Option<PathBuf>) -> Result<Self> {
        let (path, required) = match config_path {
            Some(path) => (path.to_path_buf(), true),
            None => (default_config_path(), false),
        };

        let raw: RawSettings = Config::builder()
            .set_default("refresh_secs", DEFAULT_REFRESH_SECS)?
            .add_source(File::from(path.as_path()).format(FileFormat::Toml).required(required))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("Invalid configuration")?;

        Self::resolve(raw, state_override)
    }

    fn resolve(raw: RawSettings, state_override: Option<PathBuf>) -> Result<Self> {
        if raw.refresh_secs == 0 {
            anyhow::bail!("refresh_secs must be at least 1");
        }

        let defaults = ShopConfig::default();
        let shop = ShopConfig {
            services: raw.services.unwrap_or(defaults.services),
            barbers: raw.barbers.unwrap_or(defaults.barbers),
        };

        // Fail at startup rather than on the first command
        shop.clone()
            .into_parts()
            .context("Invalid shop configuration")?;

        Ok(Self {
            shop,
            state_path: state_override
                .or(raw.state_path)
                .unwrap_or_else(default_state_path),
            refresh_secs: raw.refresh_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_file_overrides_catalog_and_roster() {
        let file = write_config(
            r#"
            state_path = "/tmp/queuesnip-test/queue.json"
            refresh_secs = 15

            [[services]]
            id = "trim"
            name = "Beard Trim"
            duration_minutes = 15
            price = 18

            [[barbers]]
            id = 9
            name = "Robin"
            "#,
        );

        let settings = Settings::load(Some(file.path()), None).unwrap();

        assert_eq!(settings.refresh_secs, 15);
        assert_eq!(settings.state_path, PathBuf::from("/tmp/queuesnip-test/queue.json"));
        assert_eq!(settings.shop.services.len(), 1);
        assert_eq!(settings.shop.services[0].id, "trim");
        assert_eq!(settings.shop.barbers, vec![Barber::new(9, "Robin", true)]);
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let file = write_config("refresh_secs = 5\n");

        let settings = Settings::load(Some(file.path()), Some(PathBuf::from("state.json"))).unwrap();

        assert_eq!(settings.shop, ShopConfig::default());
        assert_eq!(settings.state_path, PathBuf::from("state.json"));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        assert!(Settings::load(Some(&missing), None).is_err());
    }

    #[test]
    fn test_invalid_shop_is_rejected() {
        let file = write_config(
            r#"
            [[services]]
            id = "haircut"
            name = "Haircut"
            duration_minutes = 0
            price = 45
            "#,
        );

        let err = Settings::load(Some(file.path()), None).unwrap_err();
        assert!(format!("{:#}", err).contains("at least one minute"));
    }

    #[test]
    fn test_zero_refresh_is_rejected() {
        let file = write_config("refresh_secs = 0\n");
        assert!(Settings::load(Some(file.path()), None).is_err());
    }
}
