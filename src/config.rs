use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use url::Url;

use crate::{PokedexError, Result};

pub const DEFAULT_API_URL: &str = "https://pokeapi.co/api/v2/";
pub const DEFAULT_CATALOG_LIMIT: u32 = 151;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_STORAGE_ROOT: &str = ".pokedex";

/// Overrides `api_base_url` of any loaded configuration.
pub const API_URL_ENV: &str = "POKEDEX_API_URL";

/// Process-wide settings, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the remote catalog API. Always ends with `/` so relative
    /// endpoints can be joined onto it.
    #[serde(deserialize_with = "base_url")]
    pub api_base_url: Url,
    /// Number of items requested for the catalog listing.
    pub catalog_limit: u32,
    /// Upper bound of every single HTTP request.
    #[serde(rename = "request_timeout_secs", deserialize_with = "seconds")]
    pub request_timeout: Duration,
    /// Directory of the persisted favorites and profile.
    pub storage_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_URL)
                .expect("default API URL is valid"),
            catalog_limit: DEFAULT_CATALOG_LIMIT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            storage_root: PathBuf::from(DEFAULT_STORAGE_ROOT),
        }
    }
}

impl Config {
    /// Read the configuration from a JSON file. A missing file yields the
    /// defaults, missing fields fall back to their default values.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = match std::fs::read(path) {
            Ok(bytes) => serde_json::from_slice::<Config>(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!(
                    "no configuration at {}, using defaults",
                    path.display()
                );
                Config::default()
            }
            Err(e) => return Err(e.into()),
        };
        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var(API_URL_ENV) {
            log::info!("{} overrides the API URL with {}", API_URL_ENV, raw);
            self.api_base_url = normalize(Url::parse(&raw)?)?;
        }
        Ok(())
    }
}

/// Make `url` joinable: relative endpoints land below its last segment.
pub(crate) fn normalize(mut url: Url) -> Result<Url> {
    if url.cannot_be_a_base() {
        return Err(PokedexError::InvalidInput(format!(
            "API URL {url} cannot be a base"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn base_url<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Url, D::Error> {
    let url = Url::deserialize(deserializer)?;
    normalize(url).map_err(serde::de::Error::custom)
}

fn seconds<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_secs)
}
