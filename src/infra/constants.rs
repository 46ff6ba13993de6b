// =============================================================================
// EVENT LOOP
// =============================================================================

/// Poll interval while a recompute is in flight or a redraw is pending
pub const EVENT_POLL_MS: u64 = 8;

/// Poll interval when idle
pub const IDLE_POLL_MS: u64 = 50;

/// Minimum time between two frames
pub const RENDER_THROTTLE_MS: u64 = 36;

// =============================================================================
// LAYOUT
// =============================================================================

/// Width of the project tree column, in percent
pub const TREE_PANEL_PERCENT: u16 = 50;

/// Height of the glob editor including borders
pub const EDITOR_HEIGHT: u16 = 4;

// =============================================================================
// FILES
// =============================================================================

/// Under the per-user Clarion directory
pub const ERRORS_DIR: &str = "errors";

pub const PANIC_LOG_FILE: &str = "panic.log";
