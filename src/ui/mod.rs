//! Terminal front-end: screens, the router that switches between them, and
//! the event loop that drives it.

mod app;
mod export;
mod forms;
mod helpers;
mod input;
mod screens;
mod tasks;
mod terminal;
mod views;

pub use app::{App, Screen};
pub use terminal::run_app;
