pub mod api;
pub mod constants;
pub mod logging;
pub mod watcher;
