//! WaveKit Settings Crate
//!
//! Loads, validates and saves the editor configuration and turns it into the
//! [`wavekit_core::EditorSettings`] an editing session runs with.

pub mod config;
pub mod error;

pub use config::{Config, EditingSettings, ExportSettings, PresetSettings};
pub use error::{SettingsError, SettingsResult};
