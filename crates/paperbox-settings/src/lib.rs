//! PaperBox Settings Crate
//!
//! Handles the configuration file: default box parameters, laser settings and
//! output preferences.

pub mod config;
pub mod error;

pub use config::{Config, OutputFormat, OutputSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
