//! YAML configuration: the embedded seed library, exclude presets and the user settings file.
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::types::AgentPersona;

pub mod constants;

use constants::{
    CLARION_DIR, DEFAULT_API_URL, DEFAULT_DEBOUNCE_MS, DEFAULT_REQUEST_TIMEOUT_SECS, ENV_API_URL, ENV_OFFLINE,
    SETTINGS_FILE,
};

// ============================================================================
// Seed Library (embedded at compile time)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LibraryConfig {
    pub default_agent_id: String,
    pub agents: Vec<AgentPersona>,
}

fn parse_yaml<T: for<'de> Deserialize<'de>>(name: &str, content: &str) -> T {
    serde_yaml::from_str(content).unwrap_or_else(|e| panic!("Failed to parse {}: {}", name, e))
}

pub static LIBRARY: LazyLock<LibraryConfig> =
    LazyLock::new(|| parse_yaml("agents.yaml", include_str!("../../../../yamls/agents.yaml")));

pub mod library {
    use super::LIBRARY;
    use crate::types::AgentPersona;

    pub fn agents() -> &'static [AgentPersona] {
        &LIBRARY.agents
    }
    pub fn default_agent_id() -> &'static str {
        &LIBRARY.default_agent_id
    }
}

// ============================================================================
// Exclude Presets (embedded at compile time)
// ============================================================================

/// A named set of exclude globs for a common toolchain's build output.
#[derive(Debug, Clone, Deserialize)]
pub struct ExcludePreset {
    pub name: String,
    pub globs: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PresetsConfig {
    pub presets: Vec<ExcludePreset>,
}

pub static PRESETS: LazyLock<PresetsConfig> =
    LazyLock::new(|| parse_yaml("presets.yaml", include_str!("../../../../yamls/presets.yaml")));

pub mod presets {
    use super::{ExcludePreset, PRESETS};

    pub fn all() -> &'static [ExcludePreset] {
        &PRESETS.presets
    }

    /// Look a preset up by name, ignoring ASCII case.
    pub fn find(name: &str) -> Option<&'static ExcludePreset> {
        all().iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

// ============================================================================
// User Settings (~/.clarion/config.yml)
// ============================================================================

/// Where a collaborator lives: in-process or behind the backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_url: String,
    /// Who evaluates globs
    pub evaluator: Backend,
    /// Who builds the project file tree
    pub tree_source: Backend,
    /// Local means the embedded seed library
    pub agents_source: Backend,
    pub debounce_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            evaluator: Backend::Remote,
            tree_source: Backend::Local,
            agents_source: Backend::Remote,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl Settings {
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_yaml(&content, path)
    }

    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    pub fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            self.api_url = url.trim().trim_end_matches('/').to_string();
        }
        if lookup(ENV_OFFLINE).is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true")) {
            self.force_local();
        }
    }

    /// Route every collaborator in-process; nothing talks to the backend.
    pub fn force_local(&mut self) {
        self.evaluator = Backend::Local;
        self.tree_source = Backend::Local;
        self.agents_source = Backend::Local;
    }

    pub fn uses_backend(&self) -> bool {
        [self.evaluator, self.tree_source, self.agents_source].contains(&Backend::Remote)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `~/.clarion`, if a home directory can be determined.
pub fn clarion_home() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CLARION_DIR))
}

/// Load settings from `~/.clarion/config.yml` plus `.env` and process environment.
pub fn load_settings() -> Result<Settings, ConfigError> {
    dotenvy::dotenv().ok();
    let mut settings = match clarion_home() {
        Some(dir) => Settings::load_from(&dir.join(SETTINGS_FILE))?,
        None => Settings::default(),
    };
    settings.apply_env(|key| std::env::var(key).ok());
    Ok(settings)
}
