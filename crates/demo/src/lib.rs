//! Demo content for the stacking container: text labels, a reflowing web
//! page and editable tables, assembled into one screen.

/// Demo configuration loaded from TOML.
pub mod config;
/// Text content: labels and reflowing documents.
pub mod content;
/// The assembled demo screen.
pub mod screen;
/// Editable table content.
pub mod table;
/// Web-content construction and simulated page loads.
pub mod web;
