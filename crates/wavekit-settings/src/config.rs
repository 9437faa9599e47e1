//! Configuration file handling for WaveKit
//!
//! The editor reads a single file from the platform config directory
//! (`<config dir>/wavekit/config.toml`). JSON is accepted as well when the
//! path ends in `.json`. Every section and every field is optional in the
//! file; missing values take their defaults.
//!
//! Configuration is organized into sections:
//! - Grid (intervals, visibility, snapping)
//! - Editing (boundary snap, erase radius, smoothing)
//! - Export (identifier, table layout, export resolution)
//! - Presets (number of points a preset lays down)

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use wavekit_core::codec::{
    CodecOptions, DEFAULT_CAPACITY, DEFAULT_ENTRIES_PER_LINE, DEFAULT_IDENTIFIER,
};
use wavekit_core::editing::DEFAULT_ERASE_TOLERANCE;
use wavekit_core::interpolator::{DEFAULT_SMOOTH_SAMPLES, SMOOTH_SAMPLES_RANGE};
use wavekit_core::point::POSITION_MAX;
use wavekit_core::point_set::DEFAULT_BOUNDARY_SNAP;
use wavekit_core::presets::DEFAULT_PRESET_RESOLUTION;
use wavekit_core::{EditorSettings, GridSettings};

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "wavekit";
/// File name of the default configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Pointer editing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditingSettings {
    /// Positions closer than this to 0 or 100 land on the boundary point
    pub boundary_snap: f64,
    /// Erase radius of the secondary gesture, per axis
    pub erase_tolerance: f64,
    /// Samples laid down by the smoothing operation (3-5)
    pub smooth_samples: usize,
    /// Mirror boundary voltage edits onto the opposite boundary
    pub link_boundaries: bool,
}

impl Default for EditingSettings {
    fn default() -> Self {
        Self {
            boundary_snap: DEFAULT_BOUNDARY_SNAP,
            erase_tolerance: DEFAULT_ERASE_TOLERANCE,
            smooth_samples: DEFAULT_SMOOTH_SAMPLES,
            link_boundaries: false,
        }
    }
}

/// Export text settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Identifier the table is assigned to
    pub identifier: String,
    /// Number of entries in the table, padding included
    pub capacity: usize,
    /// Entries per rendered line
    pub entries_per_line: usize,
    /// Evaluate the curve at this many samples before encoding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<usize>,
    /// Emit a `// samples: N` header line
    pub sample_count_header: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            identifier: DEFAULT_IDENTIFIER.to_string(),
            capacity: DEFAULT_CAPACITY,
            entries_per_line: DEFAULT_ENTRIES_PER_LINE,
            resolution: None,
            sample_count_header: false,
        }
    }
}

impl ExportSettings {
    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions {
            identifier: self.identifier.clone(),
            capacity: self.capacity,
            entries_per_line: self.entries_per_line,
            sample_count_header: self.sample_count_header,
        }
    }
}

/// Preset generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetSettings {
    pub resolution: usize,
}

impl Default for PresetSettings {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_PRESET_RESOLUTION,
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub grid: GridSettings,
    pub editing: EditingSettings,
    pub export: ExportSettings,
    pub presets: PresetSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<platform config dir>/wavekit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;
        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default_from(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            info!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Loads the file at [`Config::default_path`], or the defaults.
    pub fn load_or_default() -> SettingsResult<Self> {
        Self::load_or_default_from(&Self::default_path()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.grid.validate()?;

        let editing = &self.editing;
        if !(0.0..POSITION_MAX / 2.0).contains(&editing.boundary_snap) {
            return Err(SettingsError::invalid(
                "editing.boundary_snap",
                "must be in 0..50",
            ));
        }
        if editing.erase_tolerance.is_nan() || editing.erase_tolerance <= 0.0 {
            return Err(SettingsError::invalid(
                "editing.erase_tolerance",
                "must be > 0",
            ));
        }
        if !SMOOTH_SAMPLES_RANGE.contains(&editing.smooth_samples) {
            return Err(SettingsError::invalid(
                "editing.smooth_samples",
                format!(
                    "must be in {}..={}",
                    SMOOTH_SAMPLES_RANGE.start(),
                    SMOOTH_SAMPLES_RANGE.end()
                ),
            ));
        }

        let export = &self.export;
        if !is_identifier(&export.identifier) {
            return Err(SettingsError::invalid(
                "export.identifier",
                format!("'{}' is not a valid identifier", export.identifier),
            ));
        }
        if export.capacity < 2 {
            return Err(SettingsError::invalid("export.capacity", "must be >= 2"));
        }
        if export.entries_per_line == 0 {
            return Err(SettingsError::invalid("export.entries_per_line", "must be > 0"));
        }
        if let Some(resolution) = export.resolution {
            if !(2..=export.capacity).contains(&resolution) {
                return Err(SettingsError::invalid(
                    "export.resolution",
                    format!("must be in 2..={}", export.capacity),
                ));
            }
        }

        if self.presets.resolution < 2 {
            return Err(SettingsError::invalid("presets.resolution", "must be >= 2"));
        }
        // Presets export point by point unless a fixed export resolution resamples them.
        if export.resolution.is_none() && self.presets.resolution > export.capacity {
            return Err(SettingsError::invalid(
                "presets.resolution",
                format!(
                    "{} exceeds export.capacity {}",
                    self.presets.resolution, export.capacity
                ),
            ));
        }
        Ok(())
    }

    /// The settings an editing session runs with.
    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            grid: self.grid,
            boundary_snap: self.editing.boundary_snap,
            erase_tolerance: self.editing.erase_tolerance,
            smooth_samples: self.editing.smooth_samples,
            link_boundaries: self.editing.link_boundaries,
            codec: self.export.codec_options(),
            export_resolution: self.export.resolution,
            preset_resolution: self.presets.resolution,
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
