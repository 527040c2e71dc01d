//! Utility modules for codex-vivus.

mod dates;
mod text;

pub use dates::{format_date, format_date_in, parse_timestamp};
pub use text::{matches_filter, same_folded, truncate_chars};
