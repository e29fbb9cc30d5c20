/// Application configuration
use std::path::{Path, PathBuf};

use reprise_core::{ChecksumKind, RepriseError, Result};
use reprise_playback::PlayerOptions;
use serde::{Deserialize, Serialize};

/// Default configuration file, read when present
pub const DEFAULT_CONFIG_FILE: &str = "reprise.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RepriseConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub identity: IdentitySettings,

    #[serde(default)]
    pub playback: PlaybackSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentitySettings {
    /// Checksum strategy name, see [`ChecksumKind`]
    #[serde(default = "default_checksum")]
    pub checksum: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    /// Step for forward/back skips in milliseconds
    #[serde(default = "default_relative_seek_ms")]
    pub relative_seek_ms: i64,

    #[serde(default = "default_true")]
    pub continues_in_background: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl RepriseConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `reprise.toml` is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (e.g. REPRISE_PLAYBACK__RELATIVE_SEEK_MS)
        settings = settings.add_source(
            config::Environment::with_prefix("REPRISE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| RepriseError::config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| RepriseError::config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playback.relative_seek_ms <= 0 {
            return Err(RepriseError::config(format!(
                "playback.relative_seek_ms must be positive, got {}",
                self.playback.relative_seek_ms
            )));
        }

        if self.storage.database_url.is_empty() {
            return Err(RepriseError::config("storage.database_url is required"));
        }

        self.checksum_kind()?;
        Ok(())
    }

    /// Resolved checksum strategy
    ///
    /// Unknown names are reported as not implemented.
    pub fn checksum_kind(&self) -> Result<ChecksumKind> {
        self.identity.checksum.parse()
    }

    /// Options for every opened decoder
    pub fn player_options(&self) -> PlayerOptions {
        PlayerOptions {
            continues_in_background: self.playback.continues_in_background,
            auto_destroy: false,
        }
    }

    /// Directory holding the SQLite file, if the URL names one
    pub fn database_dir(&self) -> Option<PathBuf> {
        let path = self
            .storage
            .database_url
            .strip_prefix("sqlite://")
            .or_else(|| self.storage.database_url.strip_prefix("sqlite:"))?;
        let path = path.split('?').next().unwrap_or(path);
        if path.is_empty() || path.starts_with(":memory:") {
            return None;
        }

        Path::new(path)
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }
}

// Default values
impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
        }
    }
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            checksum: default_checksum(),
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            relative_seek_ms: default_relative_seek_ms(),
            continues_in_background: default_true(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://./data/reprise.db".to_string()
}

fn default_checksum() -> String {
    ChecksumKind::default().as_str().to_string()
}

fn default_relative_seek_ms() -> i64 {
    15_000
}

fn default_true() -> bool {
    true
}

fn default_log_filter() -> String {
    "reprise=info,reprise_cli=info,reprise_playback=info,reprise_storage=warn".to_string()
}
