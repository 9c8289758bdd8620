//! PalletKit Settings Crate
//!
//! Handles the planner configuration: strategy selection and the parameters
//! of each strategy, persisted as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{Config, ConfigFormat};
pub use error::{SettingsError, SettingsResult};
