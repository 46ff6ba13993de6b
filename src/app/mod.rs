pub mod actions;
mod app;
pub mod events;
pub mod input;

pub use app::{App, Focus};
