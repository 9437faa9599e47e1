//! # WaveKit Core
//!
//! The waveform model behind the WaveKit editor. A waveform is a small ordered
//! set of control points over one period (0-100 %, 0-3 V). This crate edits
//! that set, evaluates it into a dense curve, changes its resolution, and
//! encodes it as a fixed-length table of 12-bit hex samples.
//!
//! ## Layers
//!
//! ```text
//! EditSession (selection, subscribers, settings)
//!   ├── EditingRules (grid snapping, typed-value checks)
//!   │     └── PointSet (ordered points, boundary invariant)
//!   ├── interpolator / resampler (derived curves)
//!   ├── presets (parameter collection + generation)
//!   └── codec (export text <-> PointSet)
//! ```
//!
//! The UI plugs in through [`ParameterPrompt`], [`ClipboardSink`] and the
//! session's change notifications.

pub mod clipboard;
pub mod codec;
pub mod editing;
pub mod error;
pub mod interpolator;
pub mod point;
pub mod point_set;
pub mod presets;
pub mod prompt;
pub mod resampler;
pub mod session;

pub use clipboard::{ClipboardSink, MemoryClipboard};
pub use codec::{decode, encode, encode_curve, CodecOptions, ExportTable};
pub use editing::{EditingRules, GridSettings};
pub use error::{WaveformError, WaveformResult};
pub use interpolator::{evaluate, smooth_around_point, SampledCurve};
pub use point::{ControlPoint, POSITION_MAX, POSITION_MIN, VOLTAGE_MAX, VOLTAGE_MIN};
pub use point_set::{PointSet, UpsertPolicy};
pub use presets::{collect_preset_params, generate, PresetKind, PresetParams};
pub use prompt::{FloatRequest, IntegerRequest, ParameterPrompt, ScriptedPrompt};
pub use resampler::resample;
pub use session::{
    Column, EditSession, EditorSettings, RenderModel, SelectionState, SessionEvent,
    SubscriptionId, TableRow,
};
