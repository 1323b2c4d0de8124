//! Configuration Vault – reads/writes `~/.reachy-presence/config.toml`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use presence_kernel::MoodCatalog;
use presence_runtime::MoodLoopConfig;
use presence_types::{DEFAULT_DATASET, PresenceError};
use serde::{Deserialize, Serialize};

/// Persisted hook configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the robot movement daemon.
    #[serde(default = "default_daemon_url")]
    pub daemon_url: String,

    /// Recorded-move dataset the daemon plays from.
    #[serde(default = "default_dataset")]
    pub dataset: String,

    /// Base URL of the TTS server exposing `/status`.
    #[serde(default = "default_tts_url")]
    pub tts_url: String,

    /// Safety bound on one mood-loop session.
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,

    #[serde(default = "default_status_timeout_ms")]
    pub status_timeout_ms: u64,

    #[serde(default = "default_trigger_timeout_ms")]
    pub trigger_timeout_ms: u64,

    /// Pause between moves is drawn uniformly from
    /// `[pause_min_ms, pause_max_ms]`.
    #[serde(default = "default_pause_min_ms")]
    pub pause_min_ms: u64,

    #[serde(default = "default_pause_max_ms")]
    pub pause_max_ms: u64,

    /// Replaces the built-in mood table when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moods: Option<BTreeMap<String, Vec<String>>>,
}

fn default_daemon_url() -> String {
    "http://localhost:8100".to_string()
}
fn default_dataset() -> String {
    DEFAULT_DATASET.to_string()
}
fn default_tts_url() -> String {
    "http://localhost:5001".to_string()
}
fn default_max_duration_secs() -> u64 {
    60
}
fn default_status_timeout_ms() -> u64 {
    1000
}
fn default_trigger_timeout_ms() -> u64 {
    2000
}
fn default_pause_min_ms() -> u64 {
    1000
}
fn default_pause_max_ms() -> u64 {
    2000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daemon_url: default_daemon_url(),
            dataset: default_dataset(),
            tts_url: default_tts_url(),
            max_duration_secs: default_max_duration_secs(),
            status_timeout_ms: default_status_timeout_ms(),
            trigger_timeout_ms: default_trigger_timeout_ms(),
            pause_min_ms: default_pause_min_ms(),
            pause_max_ms: default_pause_max_ms(),
            moods: None,
        }
    }
}

impl Config {
    pub fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.status_timeout_ms)
    }

    pub fn trigger_timeout(&self) -> Duration {
        Duration::from_millis(self.trigger_timeout_ms)
    }

    /// Mood-loop timing from this config.  Not validated here; see
    /// [`MoodLoopConfig::validate`].
    pub fn loop_config(&self) -> MoodLoopConfig {
        MoodLoopConfig {
            max_duration: Duration::from_secs(self.max_duration_secs),
            pause_min: Duration::from_millis(self.pause_min_ms),
            pause_max: Duration::from_millis(self.pause_max_ms),
        }
    }

    /// The configured mood table, or the built-in one.
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::Catalog`] when the configured table violates
    /// a catalog invariant.
    pub fn catalog(&self) -> Result<MoodCatalog, PresenceError> {
        match &self.moods {
            Some(moods) => MoodCatalog::from_entries(moods.clone()),
            None => MoodCatalog::builtin(),
        }
    }
}

/// Return the path to `~/.reachy-presence/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".reachy-presence").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub fn load_from(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Defaults plus environment overrides, for when no file exists.
pub fn from_env() -> Config {
    let mut cfg = Config::default();
    apply_env_overrides(&mut cfg);
    cfg
}

/// Apply `PRESENCE_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `PRESENCE_DAEMON_URL` | `daemon_url` |
/// | `PRESENCE_DATASET` | `dataset` |
/// | `PRESENCE_TTS_URL` | `tts_url` |
/// | `PRESENCE_MAX_DURATION_SECS` | `max_duration_secs` |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("PRESENCE_DAEMON_URL") {
        cfg.daemon_url = v;
    }
    if let Ok(v) = std::env::var("PRESENCE_DATASET") {
        cfg.dataset = v;
    }
    if let Ok(v) = std::env::var("PRESENCE_TTS_URL") {
        cfg.tts_url = v;
    }
    if let Ok(v) = std::env::var("PRESENCE_MAX_DURATION_SECS")
        && let Ok(secs) = v.parse::<u64>()
    {
        cfg.max_duration_secs = secs;
    }
}

/// Save the config to a specific path, creating its directory if necessary.
pub fn save_to(cfg: &Config, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| {
                use std::io::Write;
                f.write_all(raw.as_bytes())
            })
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}
