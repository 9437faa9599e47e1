//! # WaveKit
//!
//! An editor for periodic waveforms drawn as control points over one period
//! (0-100 % position, 0-3 V amplitude) and exported as a fixed-length table
//! of 12-bit hex samples for firmware configuration.
//!
//! ## Architecture
//!
//! WaveKit is organized as a workspace with multiple crates:
//!
//! 1. **wavekit-core** - Point set, interpolation, resampling, presets, codec, session
//! 2. **wavekit-settings** - Configuration files and validation
//! 3. **wavekit** - Logging, system clipboard and the console front end

pub mod clipboard;
pub mod console;

pub use clipboard::SystemClipboard;
pub use console::{Command, Console, LinePrompt};

pub use wavekit_core::{
    ClipboardSink, Column, ControlPoint, EditSession, EditorSettings, GridSettings,
    MemoryClipboard, PointSet, PresetKind, SessionEvent, WaveformError, WaveformResult,
};
pub use wavekit_settings::{Config, SettingsError, SettingsResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "WAVEKIT_LOG_FORMAT";

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - RUST_LOG environment variable support (INFO by default)
/// - Pretty output on stderr, or JSON lines when `WAVEKIT_LOG_FORMAT=json`
///
/// Logs go to stderr so they never mix with the console's table output.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
            .json();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_line_number(true)
            .pretty();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
