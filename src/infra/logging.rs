use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;

use env_logger::{Builder, Env, Target};

use clarion_base::config::clarion_home;
use clarion_base::config::constants::{ENV_LOG, LOG_FILE};

/// Route `log` output to `~/.clarion/clarion.log` so it never lands on the
/// alternate screen. Level comes from `CLARION_LOG` (default `info`).
/// Returns the log path, or None when logging stays disabled.
pub fn init_logging() -> Option<PathBuf> {
    let dir = clarion_home()?;
    let path = dir.join(LOG_FILE);
    let file = fs::create_dir_all(&dir).and_then(|_| OpenOptions::new().create(true).append(true).open(&path));
    let file = match file {
        Ok(f) => f,
        Err(e) => {
            eprintln!("clarion: logging disabled, cannot open {}: {}", path.display(), e);
            return None;
        }
    };

    Builder::from_env(Env::new().filter_or(ENV_LOG, "info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .ok()?;
    Some(path)
}

/// For one-shot CLI commands: log to stderr, warnings and up by default.
pub fn init_stderr_logging() {
    let _ = Builder::from_env(Env::new().filter_or(ENV_LOG, "warn")).target(Target::Stderr).try_init();
}

/// Append a panic report under `~/.clarion/errors/`.
pub fn write_panic_report(report: &str) -> io::Result<()> {
    use std::io::Write;

    use crate::infra::constants::{ERRORS_DIR, PANIC_LOG_FILE};

    let Some(dir) = clarion_home().map(|h| h.join(ERRORS_DIR)) else { return Ok(()) };
    fs::create_dir_all(&dir)?;
    let mut file = OpenOptions::new().create(true).append(true).open(dir.join(PANIC_LOG_FILE))?;
    file.write_all(report.as_bytes())
}
