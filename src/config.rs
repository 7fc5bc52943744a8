//! Application paths and the persisted theme configuration.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".libros";
/// Overrides the data directory when set.
const HOME_ENV: &str = "LIBROS_HOME";
const DB_FILE_NAME: &str = "books.db";
const BACKUP_FILE_NAME: &str = "books.db.bak";
const CONFIG_FILE_NAME: &str = "theme.toml";
const EXPORTS_DIR_NAME: &str = "exports";
const LOG_FILE_NAME: &str = "libros.log";

/// Every on-disk location the application reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub home: PathBuf,
    pub data_dir: PathBuf,
    pub database: PathBuf,
    pub backup: PathBuf,
    pub config: PathBuf,
    pub exports: PathBuf,
    pub log: PathBuf,
}

impl AppPaths {
    /// Resolve paths from `$LIBROS_HOME`, falling back to `~/.libros`.
    pub fn discover() -> Result<Self> {
        let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        let home = base_dirs.home_dir().to_path_buf();
        let data_dir = match env::var_os(HOME_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => home.join(DATA_DIR_NAME),
        };
        Ok(Self::new(home, data_dir))
    }

    pub fn new(home: PathBuf, data_dir: PathBuf) -> Self {
        Self {
            database: data_dir.join(DB_FILE_NAME),
            backup: data_dir.join(BACKUP_FILE_NAME),
            config: data_dir.join(CONFIG_FILE_NAME),
            exports: data_dir.join(EXPORTS_DIR_NAME),
            log: data_dir.join(LOG_FILE_NAME),
            home,
            data_dir,
        }
    }

    pub fn ensure_data_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir).context("failed to create data directory")
    }
}

/// Colors for one visual theme, stored as `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub tertiary_color: String,
}

impl Theme {
    fn builtin(name: &str, primary: &str, secondary: &str, tertiary: &str) -> Self {
        Self {
            name: name.to_string(),
            primary_color: primary.to_string(),
            secondary_color: secondary.to_string(),
            tertiary_color: tertiary.to_string(),
        }
    }

    pub fn default_theme() -> Self {
        Self::builtin("Default", "#7D56F4", "#FFA500", "#FFD700")
    }

    /// The built-in themes in the order the theme screen lists them.
    pub fn all() -> Vec<Theme> {
        vec![
            Self::default_theme(),
            Self::builtin("Peach Red", "#ff5d62", "#b8e994", "#7bed9f"),
            Self::builtin("Surimi Orange", "#ff9e3b", "#70a1ff", "#1e90ff"),
            Self::builtin("Spring Blue", "#7fb4ca", "#f8a5c2", "#f78fb3"),
        ]
    }

    /// Look up a built-in theme by display name, defaulting when unknown.
    pub fn by_name(name: &str) -> Theme {
        Self::all()
            .into_iter()
            .find(|theme| theme.name == name)
            .unwrap_or_else(Self::default_theme)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Theme,
}

/// Read the config at `path`. A missing file is created with defaults; a
/// file that fails to parse is left alone and defaults are used.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        let config = Config::default();
        save_config(path, &config)?;
        info!(path = %path.display(), "wrote default config");
        return Ok(config);
    }

    let raw = fs::read_to_string(path).context("failed to read config file")?;
    match toml::from_str::<Config>(&raw) {
        Ok(config) => Ok(config),
        Err(err) => {
            warn!(%err, path = %path.display(), "ignoring unreadable config");
            Ok(Config::default())
        }
    }
}

pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    let raw = toml::to_string(config).context("failed to serialize config")?;
    fs::write(path, raw).context("failed to write config file")
}

/// Persist `theme` as the active theme, keeping any other settings.
pub fn update_theme(path: &Path, theme: &Theme) -> Result<()> {
    let mut config = load_config(path).unwrap_or_default();
    config.theme = theme.clone();
    save_config(path, &config)?;
    info!(theme = %theme.name, "saved theme");
    Ok(())
}
