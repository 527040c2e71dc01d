//! codex-vivus - read-only dashboard for a mutual-aid exchange.
//!
//! Offers and requests are published by a chat bot into an external record
//! store; this crate fetches them, derives per-kind lists and statistics and
//! shows them in a terminal UI or as plain text.
//!
//! Layers, bottom up:
//! - `config` / `store` - settings and the record-store seams
//! - `model` - deserialized rows
//! - `dashboard` - fetch, state and derivations
//! - `view` - frontend-agnostic view models
//! - `tui` - interactive terminal frontend

pub mod config;
pub mod dashboard;
pub mod model;
pub mod store;
pub mod tui;
pub mod util;
pub mod view;
