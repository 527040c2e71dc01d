//! Terminal user interface for the dashboard.
//!
//! Input, fetch results and change notifications all arrive on one event
//! channel. Fetches run on a background worker so drawing never waits for
//! the network.

mod app;
mod event;
mod input;
mod refresh;
mod render;
mod state;
mod style;
mod widgets;

pub use app::App;
pub use state::{AppState, Tab};
