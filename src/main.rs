mod app;
mod cli;
mod context;
mod infra;
mod services;
mod state;
mod ui;

use std::io;
use std::path::Path;
use std::process;

use crossterm::{
    ExecutableCommand,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::prelude::*;

use clarion_base::config::{self, Settings, library};

use app::App;
use cli::{Cli, Command, USAGE};
use infra::logging::{init_logging, init_stderr_logging, write_panic_report};
use services::Services;
use state::Workspace;

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Cli { command, local } = match cli::parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            process::exit(2);
        }
    };

    let mut settings = config::load_settings().unwrap_or_else(|e| {
        eprintln!("clarion: {}; using defaults", e);
        Settings::default()
    });
    if local {
        settings.force_local();
    }

    match command {
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        Command::Tui { root } => {
            let root = root.canonicalize().map_err(|e| io::Error::new(e.kind(), format!("{}: {}", root.display(), e)))?;
            if !root.is_dir() {
                eprintln!("clarion: {} is not a directory", root.display());
                process::exit(1);
            }
            run_tui(&root, &settings)
        }
        Command::Preview { root, patterns, json } => {
            run_oneshot(&settings, |services| cli::run_preview(services, &root, &patterns, json))
        }
        Command::Context { root, agent, select } => {
            run_oneshot(&settings, |services| cli::run_context(services, &root, agent.as_deref(), &select))
        }
        Command::Agents { delete } => run_oneshot(&settings, |services| cli::run_agents(services, delete.as_deref())),
    }
}

/// Print the output of a non-interactive command; exit 1 on failure.
fn run_oneshot(settings: &Settings, command: impl FnOnce(&Services) -> Result<String, String>) -> io::Result<()> {
    init_stderr_logging();
    let services = build_services(settings);
    match command(&services) {
        Ok(out) => {
            print!("{}", out);
            Ok(())
        }
        Err(e) => {
            eprintln!("clarion: {}", e);
            process::exit(1);
        }
    }
}

fn build_services(settings: &Settings) -> Services {
    match Services::from_settings(settings) {
        Ok(services) => services,
        Err(e) => {
            eprintln!("clarion: {}", e);
            process::exit(1);
        }
    }
}

fn run_tui(root: &Path, settings: &Settings) -> io::Result<()> {
    if let Some(path) = init_logging() {
        info!("logging to {}", path.display());
    }
    info!("opening {} (backend {})", root.display(), settings.api_url);

    // Panic hook: restore the terminal and keep the report on disk,
    // otherwise the message is lost with the alternate screen.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(DisableBracketedPaste);
        let _ = io::stdout().execute(LeaveAlternateScreen);

        let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let backtrace = std::backtrace::Backtrace::force_capture();
        let _ = write_panic_report(&format!("[{}] {}\n\n{}\n\n---\n", ts, info, backtrace));

        default_hook(info);
    }));

    let services = build_services(settings);
    let agents = services.agents.list();
    let workspace = Workspace::new(root.to_path_buf(), agents, library::default_agent_id(), settings.debounce());

    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    io::stdout().execute(EnableBracketedPaste)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut app = App::new(workspace, services);
    let result = app.run(&mut terminal);

    // Cleanup
    disable_raw_mode()?;
    io::stdout().execute(DisableBracketedPaste)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result
}
