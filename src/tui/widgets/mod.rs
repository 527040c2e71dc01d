//! TUI widgets for the dashboard.

mod cards;
mod footer;
mod header;
mod help;
mod overview;
mod quit_confirm;
mod stats;

pub use cards::render_card_list;
pub use footer::render_footer;
pub use header::render_header;
pub use help::render_help;
pub use overview::render_overview;
pub use quit_confirm::render_quit_confirm;
pub use stats::render_stats;
