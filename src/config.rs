use crate::error::ConfigError;
use crate::theme;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "mini-games.toml";
const DEFAULT_ORIGIN: &str = "https://example.com";
const DEFAULT_STORE_DIR: &str = "mini-games-data";
const DEFAULT_LOG_FILE: &str = "mini-games.log";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig
{
    /// Catalog theme the selection screen starts with.
    pub default_theme: String,
    /// Prefix for shared links, `<share_origin>/play/<token>`.
    pub share_origin: String,
    /// Uploaded images and game records live under this directory.
    pub store_dir: PathBuf,
    pub log_file: PathBuf,
}

impl Default for AppConfig
{
    fn default() -> Self
    {
        Self {
            default_theme: theme::DEFAULT_THEME.to_string(),
            share_origin: DEFAULT_ORIGIN.to_string(),
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig
{
    /// Reads `$MINI_GAMES_CONFIG`, or `./mini-games.toml` when it exists, then
    /// applies the `MINI_GAMES_ORIGIN` / `MINI_GAMES_STORE` overrides.
    pub fn load() -> Result<Self, ConfigError>
    {
        let mut config = match env::var_os("MINI_GAMES_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    Self::default()
                }
            }
        };

        if let Ok(origin) = env::var("MINI_GAMES_ORIGIN") {
            config.share_origin = origin;
        }
        if let Some(store) = env::var_os("MINI_GAMES_STORE") {
            config.store_dir = PathBuf::from(store);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError>
    {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError>
    {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError>
    {
        if theme::find(&self.default_theme).is_none() {
            return Err(ConfigError::UnknownTheme(self.default_theme.clone()));
        }
        Ok(())
    }

    pub fn share_url(&self, token: &str) -> String
    {
        format!("{}/play/{}", self.share_origin.trim_end_matches('/'), token)
    }
}
