// =============================================================================
// BACKEND
// =============================================================================

/// Backend base URL used when neither the settings file nor the environment set one
pub const DEFAULT_API_URL: &str = "http://localhost:2077";

/// Route prefix of every backend endpoint
pub const API_PREFIX: &str = "/api/v2";

/// HTTP timeout for a single backend call
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// RECOMPUTE
// =============================================================================

/// Quiet period after the last glob edit before the preview is recomputed
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Quiet period after the last file system event before the tree is reloaded
pub const TREE_RELOAD_DEBOUNCE_MS: u64 = 200;

// =============================================================================
// PROJECT TREE
// =============================================================================

/// Directory names skipped when walking a project
pub const DEFAULT_IGNORE_DIRS: &[&str] =
    &[".git", "node_modules", "dist", "build", ".vscode", ".idea", "target", "__pycache__", ".venv", "venv"];

// =============================================================================
// FILES & ENVIRONMENT
// =============================================================================

/// Per-user directory under $HOME holding settings and logs
pub const CLARION_DIR: &str = ".clarion";

pub const SETTINGS_FILE: &str = "config.yml";

pub const LOG_FILE: &str = "clarion.log";

pub const ENV_API_URL: &str = "CLARION_API_URL";

/// "1" or "true" forces every source to local
pub const ENV_OFFLINE: &str = "CLARION_OFFLINE";

/// env_logger filter string
pub const ENV_LOG: &str = "CLARION_LOG";
